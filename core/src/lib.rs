//! Typed client actions for the hybrid cloud API.
//!
//! # Overview
//! Each API call is an action type: a struct of request fields with a static
//! `RestInfo` binding and a `ParamSpec` constraint table. Calling it through
//! an `SdkClient` validates the fields, sends the request, follows long-poll
//! job handles, and converts the outcome into an `ActionResult`.
//!
//! # Design
//! - Validation errors are returned as `Err` before any I/O.
//! - Server and transport errors are data: they land in
//!   `ActionResult::error`. `throw_exception_if_error` turns them into an
//!   `ApiException` on request.
//! - A successful call always has a `value`; an empty or undecodable body
//!   yields the value type's `Default`.
//! - `SdkClient` build/parse methods are I/O free. `Transport` is the only
//!   network seam.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oss_bucket;
pub mod param;
pub mod result;
pub mod transport;
pub mod types;

pub use action::{Action, PendingCall, RestInfo};
pub use client::{PreparedCall, Response, SdkClient};
pub use config::ClientConfig;
pub use error::{ApiException, ConfigError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use oss_bucket::AddOssBucketFromRemoteAction;
pub use param::{ParamConstraint, ParamSpec};
pub use result::{ActionResult, ApiResult, ErrorCode};
pub use transport::{Transport, UreqTransport};
pub use types::{AddOssBucketFromRemoteResult, OssBucketInventory};

/// Client-side failure: transport error, malformed response, failed task.
pub const SDK_INTERNAL_ERROR: &str = "SDK.INTERNAL_ERROR";
/// A long-poll job did not finish within the call's timeout.
pub const SDK_POLLING_TIMEOUT: &str = "SDK.POLLING_TIMEOUT";
/// Non-success HTTP status without a structured error body.
pub const SDK_HTTP_ERROR: &str = "SDK.HTTP_ERROR";
