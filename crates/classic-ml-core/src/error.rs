use thiserror::Error;

/// Error type shared by the tree and network engines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MlError {
    #[error("Missing attribute: example has no value for '{attribute}'")]
    MissingAttribute { attribute: String },

    #[error("Unknown value '{value}' for attribute '{attribute}'")]
    UnknownValue { attribute: String, value: String },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Training diverged at iteration {iteration}: non-finite error or weight change")]
    Diverged { iteration: usize },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type MlResult<T> = Result<T, MlError>;
