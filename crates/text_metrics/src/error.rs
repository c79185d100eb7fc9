//! Error types for text metrics

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TextError {
    #[error("Unknown font encoding: {0}")]
    UnknownEncoding(String),
}

pub type TextResult<T> = std::result::Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TextError::UnknownEncoding("ebcdic".to_string());
        assert_eq!(err.to_string(), "Unknown font encoding: ebcdic");
    }
}
