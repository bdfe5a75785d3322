//! shardkv Binary
//!
//! Runs every `*.job` file in a directory against one shared table.

use clap::Parser;
use shardkv::job::JobDispatcher;
use shardkv::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// shardkv job runner
#[derive(Parser, Debug)]
#[command(name = "shardkv")]
#[command(about = "Concurrent in-memory key-value store driven by job files")]
#[command(version)]
struct Args {
    /// Directory containing .job files
    #[arg(short, long, default_value = "./jobs")]
    jobs: String,

    /// Output directory for .out and .bck files (defaults to the jobs directory)
    #[arg(short, long)]
    out: Option<String>,

    /// Number of worker threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Maximum concurrent backup exports
    #[arg(short = 'b', long, default_value = "1")]
    max_backups: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shardkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let output_dir = args.out.clone().unwrap_or_else(|| args.jobs.clone());

    tracing::info!("shardkv v{}", shardkv::VERSION);
    tracing::info!("Job directory: {}", args.jobs);
    tracing::info!("Output directory: {}", output_dir);

    let config = Config::builder()
        .job_dir(&args.jobs)
        .output_dir(&output_dir)
        .worker_threads(args.threads)
        .max_backups(args.max_backups)
        .build();

    let dispatcher = JobDispatcher::new(config);
    if let Err(e) = dispatcher.run() {
        tracing::error!("run failed: {}", e);
        std::process::exit(1);
    }

    tracing::info!("all jobs processed");
}
