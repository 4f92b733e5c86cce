//! Generic and typed call results.
//!
//! # Design
//! `ApiResult` is what the client hands back for any call: either an
//! `ErrorCode` or the undecoded response body. Each action turns it into an
//! `ActionResult<V>` where exactly one of `error` / `value` is set.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiException;

/// Structured error reported by the server or synthesized by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorCode {
    pub code: String,
    pub description: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elaboration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorCode>>,
}

impl ErrorCode {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            details: details.into(),
            elaboration: None,
            cause: None,
        }
    }

    /// Attach the error that led to this one.
    pub fn with_cause(mut self, cause: ErrorCode) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error[code: {}, description: {}, details: {}]",
            self.code, self.description, self.details
        )
    }
}

/// Untyped outcome of one API call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResult {
    pub error: Option<ErrorCode>,
    pub result_string: Option<String>,
}

impl ApiResult {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            error: None,
            result_string: Some(body.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failure(error: ErrorCode) -> Self {
        Self {
            error: Some(error),
            result_string: None,
        }
    }

    /// Decode the body as `T`.
    ///
    /// Returns `None` when there is no body, the body is blank, or it does not
    /// decode as `T`.
    pub fn get_result<T: DeserializeOwned>(&self) -> Option<T> {
        let body = self.result_string.as_deref()?.trim();
        if body.is_empty() {
            return None;
        }
        match serde_json::from_str(body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "result body did not decode into the expected type");
                None
            }
        }
    }
}

/// Typed outcome of one action call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult<V> {
    pub error: Option<ErrorCode>,
    pub value: Option<V>,
}

impl<V: DeserializeOwned + Default> ActionResult<V> {
    /// Convert a generic result.
    ///
    /// An error is carried over untouched and `value` stays `None`. Otherwise
    /// `value` is the decoded body, or `V::default()` if nothing decoded.
    pub fn from_api_result(res: &ApiResult) -> Self {
        if let Some(error) = &res.error {
            return Self {
                error: Some(error.clone()),
                value: None,
            };
        }
        Self {
            error: None,
            value: Some(res.get_result::<V>().unwrap_or_default()),
        }
    }
}

impl<V> ActionResult<V> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Raise the carried error, or hand the result back unchanged.
    pub fn throw_exception_if_error(self) -> Result<Self, ApiException> {
        match self.error {
            Some(error) => Err(ApiException { error }),
            None => Ok(self),
        }
    }

    /// The value, or the carried error as an `ApiException`.
    pub fn into_value(self) -> Result<V, ApiException> {
        match (self.error, self.value) {
            (Some(error), _) => Err(ApiException { error }),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(ApiException {
                error: ErrorCode::new(
                    crate::SDK_INTERNAL_ERROR,
                    "result has neither error nor value",
                    "",
                ),
            }),
        }
    }
}
