//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, NIfTI, and encoder errors, and provides semantic
//! variants for argument validation and processing failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    #[error("Transform matrix is singular and cannot be inverted")]
    SingularTransform,

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
