use std::path::PathBuf;
use thiserror::Error;

/// A result type for batch execution errors
pub type Result<T> = std::result::Result<T, ExecError>;

/// An error raised while loading or executing a batch
#[derive(Error, Debug)]
pub enum ExecError {
    /// When the user function contract is not honored
    #[error("Executor contract violation: {0}")]
    ContractViolation(String),
    /// When a case row has the wrong column count or a non-numeric value
    #[error("Malformed case row {row}: {reason}")]
    MalformedRow {
        /// 1-based row index below the header
        row: usize,
        /// what made the row unusable
        reason: String,
    },
    /// When the case file as a whole is unusable
    #[error("Invalid case file {path:?}: {reason}")]
    InvalidCaseFile {
        /// offending file
        path: PathBuf,
        /// what made the file unusable
        reason: String,
    },
    /// When a single run fails
    #[error("Run '{name}' failed: {reason}")]
    CaseFailed {
        /// run name of the failing row
        name: String,
        /// failure reported by the case function
        reason: String,
    },
    /// When some runs of the batch failed
    #[error("{failed} of {total} runs failed")]
    FailedRuns {
        /// number of failing runs
        failed: usize,
        /// total number of runs in the batch
        total: usize,
    },
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When reading the case CSV fails
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    /// When writing a run archive fails
    #[error("Archive write error")]
    WriteNpzError(#[from] ndarray_npy::WriteNpzError),
    /// When the worker pool cannot be built
    #[error(transparent)]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}
