//! Headless batch runner - play seeded matches with randomized input
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --runs 20 --seed 7
//!   cargo run --bin simulate -- --course ledge --json

use rewind_chase::simulation::{BatchSummary, SimConfig, run_batch};

fn main() {
    let config = SimConfig::from_args();

    let results = match run_batch(&config) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("simulate: {}", e);
            std::process::exit(1);
        }
    };
    let summary = BatchSummary::from_results(&results);

    if config.json {
        let report = serde_json::json!({
            "results": results,
            "summary": summary,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("simulate: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n===== Summary =====");
    println!("Runs:       {}", summary.runs);
    println!(
        "Won:        {} ({:.0}%)",
        summary.wins,
        summary.win_rate() * 100.0
    );
    println!("Lost:       {}", summary.losses);
    println!("Unfinished: {}", summary.unfinished);
    if let Some(best) = summary.best_win_time {
        println!("Best catch: {:.2}s", best);
    }
    println!("Avg samples recorded: {:.1}", summary.avg_samples);
}
