//! Error types for the math layout crate

use thiserror::Error;

/// Errors that can occur while laying out or drawing math text
#[derive(Error, Debug)]
pub enum MathError {
    /// A node needed font metrics for a size no face can have
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f64),

    /// Unknown logical font role name
    #[error("Unknown font role: {0}")]
    UnknownFontRole(String),

    /// Unknown environment instruction name or bad parameters
    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    /// Settings that cannot be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the metrics layer
    #[error("Metrics error: {0}")]
    Metrics(#[from] text_metrics::TextError),

    /// I/O error while reading or writing settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for math layout operations
pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::InvalidFontSize(-2.0);
        assert_eq!(err.to_string(), "Invalid font size: -2");
    }

    #[test]
    fn test_error_from_metrics() {
        let text_err = text_metrics::TextError::UnknownEncoding("x".to_string());
        let math_err: MathError = text_err.into();
        assert!(matches!(math_err, MathError::Metrics(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let math_err: MathError = json_err.into();
        assert!(matches!(math_err, MathError::Json(_)));
    }
}
