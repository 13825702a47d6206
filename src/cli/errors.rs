use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid spacing parameter: {spacing}. Must be a positive value, three comma-separated values, or 'original'")]
    InvalidSpacing { spacing: String },

    #[error("Invalid noise power: {value}. Must be a non-negative number or 'auto'")]
    InvalidNoisePower { value: String },

    #[error("--atlas and --transform must be given together")]
    AtlasWithoutTransform,

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Mripro(#[from] mripro::Error),
}
