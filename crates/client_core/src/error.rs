use reqwest::StatusCode;
use shared::domain::TaskId;
use thiserror::Error;

/// Failure taxonomy for client operations.
///
/// `Api` and `Transport` are both network failures; `Api` carries the most
/// specific message the server provided for a non-2xx response. None of
/// these are retried automatically — the user re-triggers the action.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Empty required input, detected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response from the backend.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Transport-level failure (connect, DNS, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The task is absent from the current view's most recently loaded
    /// list (or the backend no longer knows it).
    #[error("task {0} is not present in the current view")]
    NotFound(TaskId),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text for the blocking user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api { message, .. } => format!("Error: {message}"),
            Self::Transport(err) => format!("Error: {err}"),
            Self::NotFound(_) => "Task not found or no longer in this view.".to_string(),
        }
    }
}
