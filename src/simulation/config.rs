//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::constants::COURSES_FILE;
use crate::tuning::MOVEMENT_TUNING_FILE;

/// Configuration for a batch of headless runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of matches to run
    pub runs: u32,
    /// Base RNG seed; run `i` uses `seed + i` (None = random)
    pub seed: Option<u64>,
    /// Tick limit per match
    pub max_ticks: u32,
    /// Course name (None = first course in the file)
    pub course: Option<String>,
    pub courses_file: String,
    pub tuning_file: String,
    /// Print results as JSON instead of a summary
    pub json: bool,
    /// Suppress per-run output
    pub quiet: bool,
    /// Worker threads for the batch (0 = one per core)
    pub threads: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            seed: None,
            max_ticks: 3000, // 60 s at 50 Hz
            course: None,
            courses_file: COURSES_FILE.to_string(),
            tuning_file: MOVEMENT_TUNING_FILE.to_string(),
            json: false,
            quiet: false,
            threads: 0,
        }
    }
}

impl SimConfig {
    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse_args(&args)
    }

    /// Parse an argument list (first entry is the program name)
    pub fn parse_args(args: &[String]) -> Self {
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--runs" => {
                    if i + 1 < args.len() {
                        config.runs = args[i + 1].parse().unwrap_or(config.runs);
                        i += 1;
                    }
                }
                "--seed" => {
                    if i + 1 < args.len() {
                        config.seed = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--ticks" => {
                    if i + 1 < args.len() {
                        config.max_ticks = args[i + 1].parse().unwrap_or(config.max_ticks);
                        i += 1;
                    }
                }
                "--course" => {
                    if i + 1 < args.len() {
                        config.course = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--courses-file" => {
                    if i + 1 < args.len() {
                        config.courses_file = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--tuning" => {
                    if i + 1 < args.len() {
                        config.tuning_file = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--threads" => {
                    if i + 1 < args.len() {
                        config.threads = args[i + 1].parse().unwrap_or(config.threads);
                        i += 1;
                    }
                }
                "--json" => {
                    config.json = true;
                }
                "--quiet" | "-q" => {
                    config.quiet = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                }
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Rewind Chase Simulator

Usage: simulate [OPTIONS]

Options:
  --runs <N>             Number of matches (default: 10)
  --seed <N>             Base RNG seed for reproducible input
  --ticks <N>            Tick limit per match (default: 3000)
  --course <NAME>        Course to run (default: first in file)
  --courses-file <PATH>  Course file (default: {})
  --tuning <PATH>        Movement tuning file (default: {})
  --threads <N>          Worker threads (default: one per core)
  --json                 Print results as JSON
  -q, --quiet            Only print the summary
  -h, --help             Show this help"#,
        COURSES_FILE, MOVEMENT_TUNING_FILE
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("simulate")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let config = SimConfig::parse_args(&args(&[
            "--runs", "25", "--seed", "7", "--ticks", "500", "--course", "ledge", "--json",
            "--threads", "2",
        ]));
        assert_eq!(config.runs, 25);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_ticks, 500);
        assert_eq!(config.course.as_deref(), Some("ledge"));
        assert!(config.json);
        assert!(!config.quiet);
        assert_eq!(config.threads, 2);
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let config = SimConfig::parse_args(&args(&["--runs", "many"]));
        assert_eq!(config.runs, SimConfig::default().runs);
    }
}
