use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by engine operations
///
/// Malformed model output is never an error here: the parsers degrade to a
/// fallback value instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller input rejected before any model call
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Transport or provider failure while talking to the model
    #[error("Model provider error: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(error: anyhow::Error) -> Self {
        Self::Provider(error)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EngineError::validation("content is empty").to_string(),
            "Invalid request: content is empty"
        );
        assert_eq!(
            EngineError::Timeout(Duration::from_secs(2)).to_string(),
            "Model call timed out after 2s"
        );
    }

    #[test]
    fn test_anyhow_converts_to_provider() {
        let error: EngineError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(error, EngineError::Provider(_)));
        assert!(!error.is_validation());
        assert!(error.to_string().contains("connection reset"));
    }
}
