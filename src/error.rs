//! Error types for the harness library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The subject executable could not be started at all. A subject that
    /// starts and exits non-zero is reported through `RunResult` instead.
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("record {offset} is truncated: {trailing} trailing byte(s) at end of file")]
    TruncatedRecord { offset: u64, trailing: usize },

    #[error("invalid size: {0}")]
    InvalidSize(String),
}
