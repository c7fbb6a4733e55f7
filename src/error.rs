//! Defines the error type shared by every module of this crate.
use thiserror::Error;


/// Alias of `std::result::Result` with [`TreeError`].
pub type Result<T> = std::result::Result<T, TreeError>;


/// Errors returned by `minitrees`.
/// The first three variants are caller errors
/// (bad training input, bad prediction input, bad evaluation input).
/// The rest come from reading datasets or fitted trees.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Empty training set, empty feature list, malformed schema,
    /// or an invalid hyperparameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A feature vector given at prediction time
    /// does not match the schema the tree was fitted on.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The prediction and truth sequences differ in length.
    #[error(
        "length mismatch: {predictions} predictions, {truths} truths"
    )]
    LengthMismatch {
        /// Number of predictions.
        predictions: usize,
        /// Number of true labels.
        truths: usize,
    },

    /// Failed to read or write a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A line of a CSV file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-indexed line number in the file.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Failed to convert a `polars::DataFrame`.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    /// Failed to (de)serialize a tree or its parameters.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}


impl TreeError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }


    pub(crate) fn mismatch<S: Into<String>>(message: S) -> Self {
        Self::SchemaMismatch(message.into())
    }
}
