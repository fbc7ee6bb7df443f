//! Error taxonomy for the preprocessing tools.
//!
//! Everything here is fatal. The tools are one-pass batch jobs with no
//! partial-success mode: the first bad row, failed lookup, or failed open
//! aborts the run and leaves whatever output was already written as-is.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    /// An input file or directory could not be opened or read.
    #[error("{}: {}", path.display(), source)]
    Io { path: PathBuf, source: io::Error },

    /// A row's field count doesn't fit its format (too few tokens for the
    /// converter, anything but the exact cell count for the word list).
    #[error("{}:{}: row has {} fields, needs {}", path.display(), line, got, expected)]
    BadRowWidth {
        path: PathBuf,
        line: usize,
        expected: usize,
        got: usize,
    },

    /// An ontology chain token (underscores already removed) has no entry
    /// in the word map.
    #[error("word map has no entry for id {id:?}")]
    UnknownId { id: String },

    /// A word-list id appeared twice under the reject-duplicates policy.
    #[error("duplicate word-list id {id:?}")]
    DuplicateId { id: String },

    /// A write to an output handle failed.
    #[error("write output: {0}")]
    Output(#[from] io::Error),
}

impl PrepError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        PrepError::Io {
            path: path.to_owned(),
            source,
        }
    }
}
