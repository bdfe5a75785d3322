//! Per-job command loop
//!
//! One worker owns a job file from open to end-of-input, so commands within
//! a job execute strictly in order. Failures stay local: malformed commands
//! are reported and skipped; only an I/O failure on the job's own streams
//! abandons the job.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::backup::BackupCoordinator;
use crate::config::Config;
use crate::error::{Result, ShardError};
use crate::executor::Executor;

use super::parser::{Command, CommandReader, HELP_TEXT};

/// Run one job file start to finish.
///
/// Reads `<job_path>`, writes `<output_dir>/<jobbase>.out`, and names backup
/// files `<output_dir>/<jobbase>-<n>.bck` with `n` counting from 1 per job.
pub fn process_job(
    executor: &Executor,
    backups: &Arc<BackupCoordinator>,
    config: &Config,
    job_path: &Path,
) -> Result<()> {
    let job_base = job_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ShardError::Config(format!("bad job file name: {}", job_path.display())))?
        .to_string();

    let input = BufReader::new(File::open(job_path)?);
    let mut output = File::create(config.output_dir.join(format!("{job_base}.out")))?;

    let mut reader = CommandReader::new(input);
    let mut backup_seq: u32 = 0;

    while let Some(command) = reader.next_command() {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                tracing::error!(job = %job_base, error = %e, "invalid command, see HELP for usage");
                continue;
            }
        };

        match command {
            Command::Write { pairs } => {
                if let Err(e) = executor.write(&pairs) {
                    tracing::error!(job = %job_base, error = %e, "failed to write pairs");
                }
            }
            Command::Read { keys } => executor.read(&keys, &mut output)?,
            Command::Delete { keys } => executor.delete(&keys, &mut output)?,
            Command::Show => executor.show(&mut output)?,
            Command::Wait { delay_ms } => executor.wait(delay_ms, &mut output)?,
            Command::Backup => {
                backup_seq += 1;
                let path = config.output_dir.join(format!("{job_base}-{backup_seq}.bck"));
                if let Err(e) = backups.spawn_export(executor.store(), path) {
                    tracing::error!(job = %job_base, error = %e, "failed to start backup");
                }
            }
            Command::Help => print!("{HELP_TEXT}"),
            Command::Empty => {}
        }
    }

    Ok(())
}
