use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::mortgage::{
    BatchError, ChatServiceError, InvalidAmount, InvalidSessionId, RepositoryError,
    ResponderError,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Chat(ChatServiceError),
    Batch(BatchError),
    Eligibility(InvalidAmount),
    Session(InvalidSessionId),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Chat(err) => write!(f, "conversation error: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
            AppError::Eligibility(err) => write!(f, "eligibility error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Chat(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Eligibility(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Chat(ChatServiceError::EmptyMessage)
            | AppError::Session(_)
            | AppError::Batch(_)
            | AppError::Eligibility(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Chat(ChatServiceError::ResponderUnavailable(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Chat(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<InvalidAmount> for AppError {
    fn from(value: InvalidAmount) -> Self {
        Self::Eligibility(value)
    }
}

impl From<ChatServiceError> for AppError {
    fn from(value: ChatServiceError) -> Self {
        Self::Chat(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Chat(ChatServiceError::Repository(value))
    }
}

impl From<ResponderError> for AppError {
    fn from(value: ResponderError) -> Self {
        Self::Chat(ChatServiceError::ResponderUnavailable(value))
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

impl From<InvalidSessionId> for AppError {
    fn from(value: InvalidSessionId) -> Self {
        Self::Session(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
