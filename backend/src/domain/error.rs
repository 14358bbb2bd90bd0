//! Domain-level error payload.
//!
//! Transport agnostic: the HTTP adapter renders it as a JSON body with a
//! status code, the WebSocket adapter as an `error` envelope.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

use crate::domain::TraceId;
use crate::domain::user::{CurrencyError, UserValidationError};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Message used for every insufficient-balance rejection.
pub const INSUFFICIENT_CURRENCY_MESSAGE: &str = "Insufficient currency";

/// Message used when a named player does not exist.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The player cannot afford the requested draw.
    InsufficientFunds,
    /// The requested player does not exist.
    NotFound,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Wire form of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InsufficientFunds => "insufficient_funds",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }
}

/// Validation failures raised when constructing an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    /// The message is blank once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Error payload shared by every adapter.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
///
/// # Examples
/// ```
/// use gacha_backend::domain::{Error, ErrorCode};
///
/// let err = Error::insufficient_funds();
/// assert_eq!(err.code(), ErrorCode::InsufficientFunds);
/// assert_eq!(err.message(), "Insufficient currency");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "insufficient_funds")]
    code: ErrorCode,
    #[schema(example = "Insufficient currency")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    ///
    /// An empty message is replaced with the code's wire name.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.as_str().to_owned(),
            trace_id: current_trace_id(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyMessage`] for blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: current_trace_id(),
            details: None,
        })
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured at construction or attached later.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured context, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier, replacing any captured one.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed or invalid input.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Missing resource.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Unexpected failure; redacted by every adapter.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The single insufficient-balance rejection.
    #[must_use]
    pub fn insufficient_funds() -> Self {
        Self::new(ErrorCode::InsufficientFunds, INSUFFICIENT_CURRENCY_MESSAGE)
    }

    /// The unknown-player rejection.
    #[must_use]
    pub fn user_not_found() -> Self {
        Self::not_found(USER_NOT_FOUND_MESSAGE)
    }
}

fn current_trace_id() -> Option<String> {
    TraceId::current().map(|id| id.to_string())
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": "username",
            "code": value.code(),
        }))
    }
}

impl From<CurrencyError> for Error {
    fn from(value: CurrencyError) -> Self {
        match value {
            CurrencyError::Insufficient { .. } => Self::insufficient_funds(),
            CurrencyError::Overflow { .. } => Self::invalid_request(value.to_string())
                .with_details(json!({ "field": "amount", "code": "overflow" })),
        }
    }
}
