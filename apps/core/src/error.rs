use std::io;
use thiserror::Error;

/// Crate-wide error type, consolidating every failure the responder can surface.
///
/// Most of these never reach the user: scorer faults are absorbed by the
/// selector, end-of-input and interrupts end the session normally. What is
/// left are startup problems (bad configuration) and a broken output stream.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents failures of the interactive line editor.
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Represents a failure to install the interrupt handler.
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    /// Represents malformed JSON in a profile or session history file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents configuration-related errors (bad profile, invalid pattern).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents data validation errors (e.g., an empty reply pool).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents a sentiment scorer that failed or returned unusable data.
    #[error("Sentiment scorer unavailable: {0}")]
    Scorer(String),
}

impl From<regex::Error> for ChatError {
    fn from(err: regex::Error) -> Self {
        ChatError::Config(format!("Invalid pattern: {}", err))
    }
}

impl From<validator::ValidationErrors> for ChatError {
    fn from(err: validator::ValidationErrors) -> Self {
        ChatError::Validation(format!("Validation errors: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_error_maps_to_config() {
        let err: ChatError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error: Invalid pattern"));
    }

    #[test]
    fn test_scorer_error_display() {
        let err = ChatError::Scorer("compound missing".to_string());
        assert_eq!(err.to_string(), "Sentiment scorer unavailable: compound missing");
    }
}
