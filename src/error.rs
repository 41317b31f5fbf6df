//! Error taxonomy for the signal pipeline
//!
//! Configuration problems are surfaced before any computation starts.
//! Degenerate sizes (zero or one sample) are not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("alpha must be a finite value in [0, 1], got {0}")]
    AlphaOutOfRange(f64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FusionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Fails with `LengthMismatch` unless `got == expected`.
    pub(crate) fn check_len(context: &'static str, expected: usize, got: usize) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                context,
                expected,
                got,
            })
        }
    }
}

pub type Result<T> = std::result::Result<T, FusionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(FusionError::check_len("x", 3, 3).is_ok());
        let err = FusionError::check_len("reference", 3, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "reference length mismatch: expected 3, got 2"
        );
    }
}
