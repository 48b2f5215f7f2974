//! Headless App Builder
//!
//! Builds a windowless Bevy app with the core plugin and a selected course.
//! Used by the simulate binary, the scenario harness and tests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::constants::FIXED_TIMESTEP;
use crate::course::{CourseDatabase, CourseDef, SelectedCourse};
use crate::plugin::ChaseCorePlugin;
use crate::tuning::MovementTuning;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    course: Option<CourseDef>,
    tuning: Option<MovementTuning>,
    minimal_threads: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    pub fn new() -> Self {
        Self {
            course: None,
            tuning: None,
            minimal_threads: false,
        }
    }

    /// Course to spawn (default: the built-in course)
    pub fn with_course(mut self, course: CourseDef) -> Self {
        self.course = Some(course);
        self
    }

    pub fn with_tuning(mut self, tuning: MovementTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps back to back to keep thread churn down.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Build the app with minimal plugins, the core plugin and the course.
    /// Startup has not run yet; `HeadlessMatch::new` does that.
    pub fn build(self) -> App {
        let mut app = App::new();
        let frame = Duration::from_secs_f64(FIXED_TIMESTEP);

        if self.minimal_threads {
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(frame))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
        }

        // Transform plugin for GlobalTransform propagation
        app.add_plugins(bevy::transform::TransformPlugin);

        if let Some(tuning) = self.tuning {
            app.insert_resource(tuning);
        }
        let course = self
            .course
            .or_else(|| CourseDatabase::builtin().courses.into_iter().next());
        if let Some(course) = course {
            app.insert_resource(SelectedCourse(course));
        }

        app.add_plugins(ChaseCorePlugin);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_state::MatchState;
    use crate::replay::FrameBuffer;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new().build();
        assert!(app.world().contains_resource::<MatchState>());
        assert!(app.world().contains_resource::<FrameBuffer>());
        assert!(app.world().contains_resource::<SelectedCourse>());
    }

    #[test]
    fn test_custom_tuning_is_kept() {
        let tuning = MovementTuning {
            move_speed: 3.0,
            ..Default::default()
        };
        let app = HeadlessAppBuilder::new()
            .with_tuning(tuning.clone())
            .with_minimal_threads()
            .build();
        assert_eq!(*app.world().resource::<MovementTuning>(), tuning);
    }
}
