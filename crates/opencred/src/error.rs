use crate::config::ConfigError;
use crate::lending::assistant::ApplicationSession;
use crate::lending::backend::BackendError;
use crate::lending::http::HttpClientError;
use crate::lending::intake::{DocumentError, FormError};
use crate::lending::review::ReviewError;
use crate::lending::tracking::PollError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    HttpClient(HttpClientError),
    Backend(BackendError),
    Form(FormError),
    Document(DocumentError),
    Poll(PollError),
    Review(ReviewError),
    Csv(csv::Error),
    Json(serde_json::Error),
    Session(SessionUnavailable),
}

/// A saved [`ApplicationSession`] that no longer yields fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUnavailable {
    Expired,
    Consumed,
}

impl SessionUnavailable {
    pub fn of(session: &ApplicationSession) -> Self {
        if session.is_cleared() {
            SessionUnavailable::Consumed
        } else {
            SessionUnavailable::Expired
        }
    }
}

impl fmt::Display for SessionUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionUnavailable::Expired => f.write_str("assistant session has expired"),
            SessionUnavailable::Consumed => f.write_str("assistant session was already used"),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::HttpClient(err) => write!(f, "http client error: {}", err),
            AppError::Backend(err) => write!(f, "{}", err),
            AppError::Form(err) => write!(f, "{}", err),
            AppError::Document(err) => write!(f, "document error: {}", err),
            AppError::Poll(err) => write!(f, "{}", err),
            AppError::Review(err) => write!(f, "{}", err),
            AppError::Csv(err) => write!(f, "csv error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Session(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::HttpClient(err) => Some(err),
            AppError::Backend(err) => Some(err),
            AppError::Form(err) => Some(err),
            AppError::Document(err) => Some(err),
            AppError::Poll(err) => Some(err),
            AppError::Review(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Session(_) => None,
        }
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

impl From<HttpClientError> for AppError {
    fn from(value: HttpClientError) -> Self {
        Self::HttpClient(value)
    }
}

impl From<BackendError> for AppError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<DocumentError> for AppError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<PollError> for AppError {
    fn from(value: PollError) -> Self {
        Self::Poll(value)
    }
}

impl From<ReviewError> for AppError {
    fn from(value: ReviewError) -> Self {
        Self::Review(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<SessionUnavailable> for AppError {
    fn from(value: SessionUnavailable) -> Self {
        Self::Session(value)
    }
}
