use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum RunnerApiError {
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    MissingExecutionId,
    Serde(JsonError),
    Cancelled,
    Unknown(String),
}

/// Error body shapes produced by the runner service.
///
/// The service is inconsistent: busy responses carry `{"error": ...}` while
/// input rejections carry `{"status": "error", "message": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorPayload {
    pub fn best_message(&self) -> Option<String> {
        self.message
            .as_deref()
            .and_then(non_empty_string)
            .or_else(|| self.error.as_deref().and_then(non_empty_string))
            .map(ToString::to_string)
    }
}

impl fmt::Display for RunnerApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeader(key) => write!(f, "invalid header: {key}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::MissingExecutionId => {
                write!(f, "start response did not carry an execution id")
            }
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::Cancelled => write!(f, "request was cancelled"),
            Self::Unknown(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RunnerApiError {}

impl From<reqwest::Error> for RunnerApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for RunnerApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extract the most useful human-readable message from an error response
/// body, falling back to the HTTP reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.best_message() {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
