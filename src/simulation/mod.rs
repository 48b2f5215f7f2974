//! Headless simulation - run matches without a window
//!
//! Steps the match schedules by hand for deterministic batch runs, tools and tests.

pub mod app_builder;
pub mod batch;
pub mod config;
pub mod metrics;
pub mod runner;

pub use app_builder::HeadlessAppBuilder;
pub use batch::{random_policy, run_batch, run_seeded};
pub use config::SimConfig;
pub use metrics::{BatchSummary, MatchOutcome, MatchResult};
pub use runner::{ActorSnapshot, HeadlessMatch};
