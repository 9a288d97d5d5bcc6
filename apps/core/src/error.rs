use std::io;
use thiserror::Error;

use crate::actors::messages::ActorError;
use crate::coach::completion::CompletionError;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors (unreadable email files, HTTP transport).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// A signal classifier failed to load or infer.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// The generative model returned structured output that could not be recovered.
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Represents data validation errors (e.g., empty email text, unknown label).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., missing environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Failure of a single classifier on a single input.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// The backing model could not be initialised.
    #[error("{classifier} is unavailable: {reason}")]
    Unavailable { classifier: String, reason: String },

    /// Inference ran but produced no usable label.
    #[error("{classifier} failed to classify input: {reason}")]
    Inference { classifier: String, reason: String },
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Classifier(e) => AppError::Classifier(e.clone()),
            AppError::Completion(e) => AppError::Completion(e.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Analysis task failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Io(io::Error::other(format!("HTTP error: {}", err)))
    }
}

#[cfg(feature = "semantic")]
impl From<fastembed::Error> for AppError {
    fn from(err: fastembed::Error) -> Self {
        AppError::Internal(format!("Embedding error: {}", err))
    }
}
