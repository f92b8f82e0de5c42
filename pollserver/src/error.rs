//! PollServer error types

use axum::http::StatusCode;
use shared::SharedError;
use thiserror::Error;

/// Malformed or out-of-range input. Never fatal and never mutates the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing {0}")]
    MissingField(String),

    #[error("Class name must be 1-8 characters from the device character set: {name:?}")]
    InvalidRosterName { name: String },

    #[error("No valid students")]
    EmptyRoster,

    #[error("Unknown question type: {raw}")]
    UnknownQuestionType { raw: String },

    #[error("{kind}: 2-10 choices required, got {count}")]
    InvalidChoiceCount { kind: String, count: usize },

    #[error("Question text required")]
    EmptyQuestionText,

    #[error("Malformed request body: {details}")]
    MalformedRequest { details: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidRosterName { .. } => "invalid_roster_name",
            ValidationError::EmptyRoster => "empty_roster",
            ValidationError::UnknownQuestionType { .. } => "unknown_question_type",
            ValidationError::InvalidChoiceCount { .. } => "invalid_choice_count",
            ValidationError::EmptyQuestionText => "empty_question_text",
            ValidationError::MalformedRequest { .. } => "malformed_request",
        }
    }
}

/// Failure reported by the response-device infrastructure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Not connected to response services")]
    NotConnected,

    #[error("Device connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Device command {command} failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Response subscriber closed")]
    SubscriberClosed,
}

impl AdapterError {
    pub fn command(command: &str, reason: impl Into<String>) -> Self {
        AdapterError::CommandFailed {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PollServerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No class/students setup. Use /class/setup first.")]
    NoRosterConfigured,

    #[error("A poll is running. Stop it before replacing the class.")]
    PollActive,

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PollServerError {
    pub fn config(message: impl Into<String>) -> Self {
        PollServerError::Config { message: message.into() }
    }

    /// Stable snake_case name reported to clients next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            PollServerError::Validation(e) => e.kind(),
            PollServerError::NoRosterConfigured => "no_roster_configured",
            PollServerError::PollActive => "poll_active",
            PollServerError::Adapter(_) => "adapter_error",
            PollServerError::Config { .. } => "config_error",
            PollServerError::ServerStartup(_) => "server_startup",
            PollServerError::Shared(_) => "shared_error",
            PollServerError::Io(_) => "io_error",
            PollServerError::Json(_) => "json_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PollServerError::Validation(_) | PollServerError::NoRosterConfigured => StatusCode::BAD_REQUEST,
            PollServerError::PollActive => StatusCode::CONFLICT,
            PollServerError::Adapter(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PollServerResult<T> = Result<T, PollServerError>;
