//! Job Module
//!
//! Everything between a `*.job` file on disk and the command executor.
//!
//! ## Responsibilities
//! - Parse the textual command grammar into [`Command`] values
//! - Run one job start to finish (a single worker owns a job throughout,
//!   so commands within a job execute strictly in order)
//! - Dispatch job files to a fixed pool of worker threads
//!
//! No job's failures cross a job boundary: a malformed command is skipped, an
//! unreadable job file is abandoned, and every other job keeps running.

mod parser;
mod runner;
mod dispatcher;

pub use parser::{parse_line, Command, CommandReader, HELP_TEXT, MAX_BATCH};
pub use runner::process_job;
pub use dispatcher::JobDispatcher;
