//! Job command grammar
//!
//! Line-oriented, one command per line:
//!
//! ```text
//! WRITE [(key,value),(key2,value2),...]
//! READ [key,key2,...]
//! DELETE [key,key2,...]
//! SHOW
//! WAIT <delay_ms>
//! BACKUP
//! HELP
//! ```
//!
//! A blank line parses to [`Command::Empty`] (skipped); end of input ends the
//! job. An unparseable line yields `MalformedCommand`: the runner reports it
//! on the error channel and moves on. Batches are capped at [`MAX_BATCH`]
//! items; overflow items are dropped with a diagnostic while the rest of the
//! batch still applies.

use std::io::BufRead;

use crate::error::{Result, ShardError};

/// Maximum pairs/keys accepted for one WRITE/READ/DELETE command.
pub const MAX_BATCH: usize = 256;

/// Usage text for the HELP command.
pub const HELP_TEXT: &str = "Available commands:\n\
    \x20 WRITE [(key,value),(key2,value2),...]\n\
    \x20 READ [key,key2,...]\n\
    \x20 DELETE [key,key2,...]\n\
    \x20 SHOW\n\
    \x20 WAIT <delay_ms>\n\
    \x20 BACKUP\n\
    \x20 HELP\n";

/// A parsed job command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply a batch of key/value pairs
    Write { pairs: Vec<(String, String)> },

    /// Look up a batch of keys
    Read { keys: Vec<String> },

    /// Remove a batch of keys
    Delete { keys: Vec<String> },

    /// Dump every stored entry
    Show,

    /// Pause the calling worker
    Wait { delay_ms: u64 },

    /// Export a point-in-time snapshot to disk
    Backup,

    /// Print usage to stdout
    Help,

    /// Blank line, skipped
    Empty,
}

/// Parse one line of a job file.
pub fn parse_line(line: &str) -> Result<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }

    let (op, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((op, rest)) => (op, rest.trim()),
        None => (trimmed, ""),
    };

    match op {
        "WRITE" => Ok(Command::Write {
            pairs: parse_pairs(rest).ok_or_else(|| malformed(trimmed))?,
        }),
        "READ" => Ok(Command::Read {
            keys: parse_keys(rest).ok_or_else(|| malformed(trimmed))?,
        }),
        "DELETE" => Ok(Command::Delete {
            keys: parse_keys(rest).ok_or_else(|| malformed(trimmed))?,
        }),
        "SHOW" if rest.is_empty() => Ok(Command::Show),
        "WAIT" => {
            let delay_ms = rest.parse::<u64>().map_err(|_| malformed(trimmed))?;
            Ok(Command::Wait { delay_ms })
        }
        "BACKUP" if rest.is_empty() => Ok(Command::Backup),
        "HELP" if rest.is_empty() => Ok(Command::Help),
        _ => Err(malformed(trimmed)),
    }
}

fn malformed(line: &str) -> ShardError {
    ShardError::MalformedCommand(line.to_string())
}

/// `[(k,v),(k2,v2)]`; commas between pairs are optional, keys/values non-empty.
fn parse_pairs(input: &str) -> Option<Vec<(String, String)>> {
    let body = bracket_body(input)?;
    let mut pairs = Vec::new();
    let mut rest = body.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    while !rest.is_empty() {
        let inner = rest.strip_prefix('(')?;
        let close = inner.find(')')?;
        let (key, value) = inner[..close].split_once(',')?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return None;
        }
        push_capped(&mut pairs, (key.to_string(), value.to_string()), "pair");
        rest = inner[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }
    if pairs.is_empty() {
        return None;
    }
    Some(pairs)
}

/// `[k1,k2,...]`; keys must be non-empty.
fn parse_keys(input: &str) -> Option<Vec<String>> {
    let body = bracket_body(input)?;
    let mut keys = Vec::new();
    for raw in body.split(',') {
        let key = raw.trim();
        if key.is_empty() {
            return None;
        }
        push_capped(&mut keys, key.to_string(), "key");
    }
    if keys.is_empty() {
        return None;
    }
    Some(keys)
}

fn bracket_body(input: &str) -> Option<&str> {
    input
        .trim()
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
}

/// Append up to [`MAX_BATCH`] items; overflow is dropped with a diagnostic
/// and the rest of the batch still applies.
fn push_capped<T: std::fmt::Debug>(items: &mut Vec<T>, item: T, what: &str) {
    if items.len() < MAX_BATCH {
        items.push(item);
    } else {
        tracing::warn!(
            dropped = ?item,
            "capacity exceeded: batch capped at {MAX_BATCH} items, {what} dropped"
        );
    }
}

/// Pulls commands out of a job input stream, one line at a time.
pub struct CommandReader<R: BufRead> {
    input: R,
    line: String,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
        }
    }

    /// Next command, `None` at end of input (end of the job).
    ///
    /// A malformed line yields `Some(Err(..))`; the caller reports it and
    /// keeps reading.
    pub fn next_command(&mut self) -> Option<Result<Command>> {
        self.line.clear();
        match self.input.read_line(&mut self.line) {
            Ok(0) => None,
            Ok(_) => Some(parse_line(&self.line)),
            Err(e) => Some(Err(e.into())),
        }
    }
}
