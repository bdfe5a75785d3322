//! Job Dispatcher
//!
//! A fixed pool of worker threads drains the discovered `*.job` files. The
//! shared cursor lives behind its own mutex, independent of the table locks
//! and the backup admission lock: three lock domains, no false contention.
//!
//! No ordering is guaranteed between job files; each claimed file is
//! processed start to finish by the worker that claimed it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backup::BackupCoordinator;
use crate::config::Config;
use crate::error::Result;
use crate::executor::Executor;
use crate::store::Store;

use super::runner::process_job;

/// Owns the store, the backup coordinator, and the worker pool for one run.
pub struct JobDispatcher {
    config: Config,
    store: Arc<Store>,
    backups: Arc<BackupCoordinator>,
}

impl JobDispatcher {
    pub fn new(config: Config) -> Self {
        let backups = Arc::new(BackupCoordinator::new(config.max_backups));
        Self {
            config,
            store: Arc::new(Store::new()),
            backups,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Process every job file in the configured directory, then drain
    /// in-flight backups and terminate the store.
    pub fn run(&self) -> Result<()> {
        self.store.init()?;
        fs::create_dir_all(&self.config.output_dir)?;

        let jobs = discover_jobs(&self.config.job_dir)?;
        tracing::info!(
            jobs = jobs.len(),
            workers = self.config.worker_threads,
            "dispatching job files"
        );

        let cursor = Mutex::new(0usize);
        let executor = Executor::new(Arc::clone(&self.store));

        let pool = crossbeam::thread::scope(|scope| {
            for _ in 0..self.config.worker_threads.max(1) {
                scope.spawn(|_| self.worker_loop(&jobs, &cursor, &executor));
            }
        });
        if pool.is_err() {
            tracing::error!("a worker thread panicked");
        }

        self.backups.wait_for_all();
        self.store.terminate()?;
        Ok(())
    }

    /// Claim job files off the shared cursor until the list is exhausted.
    fn worker_loop(&self, jobs: &[PathBuf], cursor: &Mutex<usize>, executor: &Executor) {
        loop {
            let job_path = {
                let mut next = cursor.lock();
                if *next >= jobs.len() {
                    break;
                }
                let path = &jobs[*next];
                *next += 1;
                path
            };

            tracing::debug!(job = %job_path.display(), "processing job file");
            if let Err(e) = process_job(executor, &self.backups, &self.config, job_path) {
                tracing::error!(job = %job_path.display(), error = %e, "job abandoned");
            }
        }
    }
}

/// All `*.job` files in `dir`, sorted for a deterministic claiming order.
fn discover_jobs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut jobs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "job") {
            jobs.push(path);
        }
    }
    jobs.sort();
    Ok(jobs)
}
