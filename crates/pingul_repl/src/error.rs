use std::{io, path::PathBuf};

use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures of the `pingul` binary itself (never of the program it runs)
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read `{}`: {source}", .path.display())]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("{0} parse error(s)")]
    Parse(usize),
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}
