//! Course database - TOML parsing and storage

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ChaseError, Result};
use crate::powerup::PowerupKind;

/// Axis-aligned box given by its centre and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectDef {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupDef {
    pub kind: PowerupKind,
    pub x: f32,
    pub y: f32,
}

/// Single course definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDef {
    pub name: String,
    #[serde(default)]
    pub platforms: Vec<RectDef>,
    pub runner_spawn: [f32; 2],
    /// A course without a chaser can be run but never won
    #[serde(default)]
    pub chaser_spawn: Option<[f32; 2]>,
    /// Where the replay starts; the runner spawn when omitted
    #[serde(default)]
    pub replay_start: Option<[f32; 2]>,
    #[serde(default)]
    pub finish: Option<RectDef>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
}

impl CourseDef {
    pub fn runner_spawn(&self) -> Vec2 {
        Vec2::from_array(self.runner_spawn)
    }

    pub fn chaser_spawn(&self) -> Option<Vec2> {
        self.chaser_spawn.map(Vec2::from_array)
    }

    pub fn replay_start(&self) -> Vec2 {
        self.replay_start
            .map(Vec2::from_array)
            .unwrap_or_else(|| self.runner_spawn())
    }
}

/// Database of all loaded courses
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CourseDatabase {
    #[serde(rename = "course", default)]
    pub courses: Vec<CourseDef>,
}

impl Default for CourseDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CourseDatabase {
    /// Parse course data from a TOML string
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let db: Self = toml::from_str(content).map_err(|e| ChaseError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if db.courses.is_empty() {
            return Err(ChaseError::Parse {
                path: path.to_path_buf(),
                message: "no [[course]] tables".to_string(),
            });
        }
        Ok(db)
    }

    /// Read and parse a course file
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ChaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Load courses from file, returns the built-in course on error
    pub fn load_from_file(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(db) => {
                info!("Loaded {} courses from {}", db.len(), path.display());
                db
            }
            Err(e) => {
                warn!("{}, using built-in course", e);
                Self::builtin()
            }
        }
    }

    /// Hardcoded fallback course: a flat run with one speed-up pickup
    pub fn builtin() -> Self {
        Self {
            courses: vec![CourseDef {
                name: "training_run".to_string(),
                platforms: vec![RectDef {
                    x: 25.0,
                    y: -0.5,
                    width: 70.0,
                    height: 1.0,
                }],
                runner_spawn: [0.0, 1.0],
                chaser_spawn: Some([-4.0, 1.0]),
                replay_start: None,
                finish: Some(RectDef {
                    x: 20.0,
                    y: 3.0,
                    width: 1.0,
                    height: 6.0,
                }),
                pickups: vec![PickupDef {
                    kind: PowerupKind::SpeedUp,
                    x: 8.0,
                    y: 1.0,
                }],
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CourseDef> {
        self.courses.iter().find(|c| c.name == name)
    }

    /// Course by name, or the first one when no name is given
    pub fn select(&self, name: Option<&str>) -> Result<&CourseDef> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| ChaseError::UnknownCourse(name.to_string())),
            None => self
                .courses
                .first()
                .ok_or_else(|| ChaseError::UnknownCourse("<none>".to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[course]]
name = "ledge"
runner_spawn = [0.0, 1.0]
chaser_spawn = [-3.0, 1.0]
replay_start = [1.0, 1.0]
finish = { x = 12.0, y = 2.0, width = 1.0, height = 4.0 }
platforms = [
    { x = 5.0, y = -0.5, width = 30.0, height = 1.0 },
    { x = 8.0, y = 2.5, width = 4.0, height = 0.5 },
]
pickups = [{ kind = "slow_down", x = 4.0, y = 1.0 }]

[[course]]
name = "bare"
runner_spawn = [0.0, 1.0]
"#;

    #[test]
    fn test_parse_courses() {
        let db = CourseDatabase::parse(SAMPLE, Path::new("test.toml")).unwrap();
        assert_eq!(db.len(), 2);

        let ledge = db.get("ledge").unwrap();
        assert_eq!(ledge.platforms.len(), 2);
        assert_eq!(ledge.pickups[0].kind, PowerupKind::SlowDown);
        assert_eq!(ledge.replay_start(), Vec2::new(1.0, 1.0));
        assert_eq!(ledge.finish.unwrap().size(), Vec2::new(1.0, 4.0));

        let bare = db.get("bare").unwrap();
        assert!(bare.finish.is_none());
        assert!(bare.chaser_spawn().is_none());
        // Replay start falls back to the runner spawn
        assert_eq!(bare.replay_start(), bare.runner_spawn());
    }

    #[test]
    fn test_select_course() {
        let db = CourseDatabase::parse(SAMPLE, Path::new("test.toml")).unwrap();
        assert_eq!(db.select(None).unwrap().name, "ledge");
        assert_eq!(db.select(Some("bare")).unwrap().name, "bare");
        assert!(matches!(
            db.select(Some("missing")),
            Err(ChaseError::UnknownCourse(_))
        ));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let result = CourseDatabase::parse("", Path::new("empty.toml"));
        assert!(matches!(result, Err(ChaseError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let db = CourseDatabase::load_from_file(Path::new("does/not/exist.toml"));
        assert_eq!(db.names().collect::<Vec<_>>(), vec!["training_run"]);
    }
}
