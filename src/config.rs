//! Configuration for shardkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a shardkv run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Job Input/Output
    // -------------------------------------------------------------------------
    /// Directory scanned for `*.job` files
    pub job_dir: PathBuf,

    /// Directory receiving `<jobbase>.out` and `<jobbase>-<n>.bck` files
    pub output_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------
    /// Number of worker threads draining the job queue
    pub worker_threads: usize,

    /// Maximum number of backup exports in flight at once
    pub max_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job_dir: PathBuf::from("./jobs"),
            output_dir: PathBuf::from("./jobs"),
            worker_threads: 4,
            max_backups: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory scanned for job files
    pub fn job_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.job_dir = path.into();
        self
    }

    /// Set the directory receiving output and backup files
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum number of concurrent backup exports
    pub fn max_backups(mut self, count: usize) -> Self {
        self.config.max_backups = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
