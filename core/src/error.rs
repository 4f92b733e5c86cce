//! Error types for the SDK.
//!
//! # Design
//! Only local failures are Rust errors. A server or transport failure is a
//! normal outcome of a call and travels inside `ActionResult::error` as an
//! `ErrorCode`; callers opt into turning it into an `ApiException` with
//! `throw_exception_if_error`.

use thiserror::Error;

use crate::result::ErrorCode;

/// A request parameter violated its declared constraint. Raised before any
/// network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing mandatory parameter [{0}]")]
    MissingRequired(String),

    #[error("parameter [{name}] exceeds max length {max} (got {actual})")]
    TooLong {
        name: String,
        max: usize,
        actual: usize,
    },

    #[error("parameter [{0}] cannot be an empty string")]
    EmptyString(String),

    #[error("parameter [{0}] cannot be an empty collection")]
    EmptyCollection(String),

    #[error("parameter [{0}] cannot contain null elements")]
    NullElement(String),

    #[error("parameter [{name}] has invalid value [{value}], allowed values are {allowed:?}")]
    InvalidValue {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("parameter [{name}] has unexpected type, expected {expected}")]
    WrongType { name: String, expected: &'static str },

    #[error("request parameters could not be serialized: {0}")]
    Serialization(String),
}

impl ValidationError {
    /// Name of the offending parameter, when there is one.
    pub fn param(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequired(name)
            | ValidationError::EmptyString(name)
            | ValidationError::EmptyCollection(name)
            | ValidationError::NullElement(name)
            | ValidationError::TooLong { name, .. }
            | ValidationError::InvalidValue { name, .. }
            | ValidationError::WrongType { name, .. } => Some(name),
            ValidationError::Serialization(_) => None,
        }
    }
}

/// A completed call carried an error and the caller asked for it to be raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct ApiException {
    pub error: ErrorCode,
}

impl From<ErrorCode> for ApiException {
    fn from(error: ErrorCode) -> Self {
        Self { error }
    }
}

/// Failure reported by a `Transport` before any HTTP status was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("reading response from {url} failed: {message}")]
    Read { url: String, message: String },
}

/// The client configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value [{value}] for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
