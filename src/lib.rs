// src/lib.rs
pub mod cli;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod output;
pub mod queue;
pub mod resolver;
pub mod signal;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use counters::Counters;
pub use engine::WorkerPool;
pub use output::{ConsoleSink, FileSink, ResultSink, TeeSink};
pub use queue::WorkQueue;
pub use resolver::{Resolve, Resolver};
pub use types::{Config, FailureReason, Hit, ResolutionOutcome, ScanError, ScanSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
