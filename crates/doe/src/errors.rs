use thiserror::Error;

/// A result type for design composition errors
pub type Result<T> = std::result::Result<T, DoeError>;

/// An error raised while composing a batch design
#[derive(Error, Debug)]
pub enum DoeError {
    /// When a variable specification or sample count is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// When the composed matrix has no rows or no columns
    #[error("Degenerate composition: {0}")]
    DegenerateComposition(String),
    /// When not enough unique run identifiers survive oversampling
    #[error("Name generation error: {0}")]
    NameGeneration(String),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When CSV serialization fails
    #[error(transparent)]
    CsvError(#[from] csv::Error),
}
