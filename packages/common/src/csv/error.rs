use thiserror::Error;

/// Reasons an uploaded capture is rejected.
///
/// Structural problems carry the numeric sub-code shown to users, so a
/// report like "err 5" points at the exact section that was missing.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("failed to read CSV file: {0}")]
    Read(String),

    #[error("invalid CSV file (err {0})")]
    Invalid(u8),

    #[error("failed to parse RAM value '{0}'")]
    InvalidRam(String),

    #[error("failed to parse {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("too large CSV file")]
    TooLarge,

    #[error("empty CSV file")]
    Empty,
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Read(err.to_string())
    }
}
