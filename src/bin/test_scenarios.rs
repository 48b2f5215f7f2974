//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                  # Run all scenarios
//!   cargo run --bin test-scenarios -- chase/        # Run one category
//!   cargo run --bin test-scenarios -- chase/caught  # Run a single scenario
//!   cargo run --bin test-scenarios -- --verbose     # Expected/actual on failure
//!   cargo run --bin test-scenarios -- --courses config/courses.toml

use std::fs;
use std::path::{Path, PathBuf};

use rewind_chase::COURSES_FILE;
use rewind_chase::course::CourseDatabase;
use rewind_chase::testing::{SCENARIOS_DIR, TestResult, parse_test_file, run_test};

struct Options {
    verbose: bool,
    filter: Option<String>,
    courses_file: String,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Self {
            verbose: false,
            filter: None,
            courses_file: COURSES_FILE.to_string(),
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" | "-v" => options.verbose = true,
                "--courses" => {
                    if let Some(path) = args.next() {
                        options.courses_file = path;
                    }
                }
                other if !other.starts_with('-') => options.filter = Some(other.to_string()),
                other => eprintln!("Unknown argument: {}", other),
            }
        }
        options
    }
}

#[derive(Default)]
struct Tally {
    passed: u32,
    failed: u32,
    errors: u32,
}

impl Tally {
    fn record(&mut self, result: &TestResult) {
        match result {
            TestResult::Pass { .. } => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
    }

    fn ok(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

fn main() {
    let options = Options::from_args();
    let root = Path::new(SCENARIOS_DIR);

    println!("Rewind Chase scenarios");
    println!("======================\n");

    if !root.is_dir() {
        println!("No scenarios directory at {}", SCENARIOS_DIR);
        std::process::exit(1);
    }

    let mut scenarios = Vec::new();
    collect_scenarios(root, &mut scenarios);
    scenarios.sort();
    if let Some(filter) = &options.filter {
        scenarios.retain(|path| relative(root, path).contains(filter.as_str()));
    }
    if scenarios.is_empty() {
        println!("No scenarios matched {:?}", options.filter);
        std::process::exit(1);
    }

    let courses = CourseDatabase::load_from_file(Path::new(&options.courses_file));
    let mut tally = Tally::default();
    let mut category = String::new();

    for path in &scenarios {
        let rel = relative(root, path);
        let (dir, name) = rel.rsplit_once('/').unwrap_or(("", rel.as_str()));
        let name = name.trim_end_matches(".toml");
        if dir != category {
            println!("{}/", dir);
            category = dir.to_string();
        }

        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def, &courses),
            Err(e) => TestResult::Error {
                message: e.to_string(),
            },
        };
        tally.record(&result);
        report(name, &result, options.verbose);
    }

    println!(
        "\n{} passed, {} failed, {} errors",
        tally.passed, tally.failed, tally.errors
    );
    if !tally.ok() {
        std::process::exit(1);
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn collect_scenarios(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_scenarios(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            out.push(path);
        }
    }
}

fn report(name: &str, result: &TestResult, verbose: bool) {
    let pad = 36usize.saturating_sub(name.len()).max(2);
    let dots = ".".repeat(pad);
    match result {
        TestResult::Pass { frames } => println!("  {} {} ok ({} frames)", name, dots, frames),
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
