//! Command session: reads commands line by line and prints each response.
//!
//! Responses go to `out`; rejected commands are reported on `err` and the
//! session carries on with the next line.

use std::io::{self, BufRead, Write};

use memsim_core::Simulator;
use memsim_core::sim::{Command, Response};
use thiserror::Error;
use tracing::debug;

/// Failures that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A statistics response could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Presentation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Print `> ` before reading each line.
    pub prompt: bool,
    /// Print statistics responses as JSON instead of text.
    pub json_stats: bool,
}

/// Runs commands from `input` until `exit` or end of input.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`SessionError`] if reading, writing, or JSON encoding fails.
pub fn run<R: BufRead, W: Write, E: Write>(
    sim: &mut Simulator,
    input: R,
    out: &mut W,
    err: &mut E,
    opts: SessionOptions,
) -> Result<(), SessionError> {
    let mut lines = input.lines();
    loop {
        if opts.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(err, "{e}")?;
                continue;
            }
        };

        match sim.execute(command) {
            Ok(Response::Exit) => break,
            Ok(response) if opts.json_stats && response.is_stats() => {
                writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            Ok(response) => write!(out, "{response}")?,
            Err(e) => {
                debug!(%e, line, "command rejected");
                writeln!(err, "{e}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
