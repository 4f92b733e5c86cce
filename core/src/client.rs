//! Request building, response interpretation and job polling.
//!
//! # Design
//! `SdkClient` is an explicit handle: configuration plus a shared
//! `Transport`. It is cheap to clone so async calls can move a copy onto
//! the blocking pool. The build/parse halves are public and free of I/O;
//! `dispatch` is the only place that talks to the transport.
//!
//! Long-poll calls are answered with `202 Accepted` and a job `location`.
//! The client GETs that location until it gets a terminal response or the
//! call's timeout runs out. There are no retries at this layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::ClientConfig;
use crate::error::{TransportError, ValidationError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::param;
use crate::result::{ApiResult, ErrorCode};
use crate::transport::{Transport, UreqTransport};

/// Wire name of the session parameter; sent as a header, never in the body.
pub const SESSION_ID: &str = "sessionId";

/// Lower bound on the pause between job polls.
pub const MIN_POLLING_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of interpreting a single HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Done(ApiResult),
    /// The job is still running at this location.
    Poll(String),
}

/// A validated request, ready to dispatch.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub request: HttpRequest,
    pub need_poll: bool,
    pub timeout: Duration,
    pub polling_interval: Duration,
}

#[derive(Deserialize)]
struct JobLocation {
    location: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorCode>,
}

#[derive(Debug)]
pub struct SdkClient<T = UreqTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl<T> Clone for SdkClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl SdkClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.read_timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SdkClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate the action and turn it into a dispatchable request.
    pub fn prepare<A: Action>(&self, action: &A) -> Result<PreparedCall, ValidationError> {
        let info = A::REST_INFO;
        let mut params = action.params()?;
        param::validate(A::PARAMS, &mut params)?;
        params.retain(|_, v| !v.is_null());

        let mut headers = Vec::new();
        match params.remove(SESSION_ID) {
            Some(Value::String(session)) if info.need_session => {
                headers.push(("Authorization".to_string(), format!("OAuth {session}")));
            }
            _ if info.need_session => {
                return Err(ValidationError::MissingRequired(SESSION_ID.to_string()));
            }
            _ => {}
        }

        let url = format!("{}{}", self.config.base_url(), info.path);
        let (query, body) = match info.http_method {
            HttpMethod::Get | HttpMethod::Delete => (query_pairs(&params), None),
            HttpMethod::Post | HttpMethod::Put => {
                let mut container = Map::new();
                container.insert(info.parameter_name.to_string(), Value::Object(params));
                let body = serde_json::to_string(&container)
                    .map_err(|e| ValidationError::Serialization(e.to_string()))?;
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                (Vec::new(), Some(body))
            }
        };

        Ok(PreparedCall {
            request: HttpRequest {
                method: info.http_method,
                url,
                headers,
                query,
                body,
            },
            need_poll: info.need_poll,
            timeout: action.timeout().unwrap_or(self.config.default_timeout),
            polling_interval: action
                .polling_interval()
                .unwrap_or(self.config.default_polling_interval),
        })
    }

    pub fn build_request<A: Action>(&self, action: &A) -> Result<HttpRequest, ValidationError> {
        self.prepare(action).map(|p| p.request)
    }

    /// Interpret one HTTP response.
    pub fn parse_response(&self, response: HttpResponse) -> Response {
        match response.status {
            200 if response.body.trim().is_empty() => Response::Done(ApiResult::empty()),
            200 => Response::Done(ApiResult::success(response.body)),
            204 => Response::Done(ApiResult::empty()),
            202 => match serde_json::from_str::<JobLocation>(&response.body) {
                Ok(JobLocation {
                    location: Some(location),
                }) => Response::Poll(location),
                _ => Response::Done(ApiResult::failure(ErrorCode::new(
                    crate::SDK_INTERNAL_ERROR,
                    "accepted response carried no job location",
                    response.body,
                ))),
            },
            status => Response::Done(ApiResult::failure(error_from_body(status, response.body))),
        }
    }

    /// Send a prepared call and, for long-poll calls, follow the job to
    /// completion.
    pub fn dispatch(&self, call: PreparedCall) -> ApiResult {
        debug!(method = %call.request.method, url = %call.request.url, "dispatching API call");
        // `None` when the timeout is too large to represent: wait indefinitely.
        let deadline = Instant::now().checked_add(call.timeout);
        let response = match self.transport.send(&call.request) {
            Ok(response) => response,
            Err(e) => return transport_failure(e),
        };

        match self.parse_response(response) {
            Response::Done(result) => result,
            Response::Poll(location) if call.need_poll => {
                self.poll(location, &call.request.headers, deadline, call.polling_interval, call.timeout)
            }
            Response::Poll(location) => ApiResult::failure(ErrorCode::new(
                crate::SDK_INTERNAL_ERROR,
                "server returned a job handle for a call that does not poll",
                location,
            )),
        }
    }

    fn poll(
        &self,
        mut location: String,
        headers: &[(String, String)],
        deadline: Option<Instant>,
        interval: Duration,
        timeout: Duration,
    ) -> ApiResult {
        let interval = interval.max(MIN_POLLING_INTERVAL);
        let auth: Vec<(String, String)> = headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("Authorization"))
            .cloned()
            .collect();

        loop {
            debug!(%location, "polling job");
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: location.clone(),
                headers: auth.clone(),
                query: Vec::new(),
                body: None,
            };
            let response = match self.transport.send(&request) {
                Ok(response) => response,
                Err(e) => return transport_failure(e),
            };
            match self.parse_response(response) {
                Response::Done(result) => return result,
                Response::Poll(next) => location = next,
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    warn!(%location, ?timeout, "job did not finish before the call timed out");
                    return ApiResult::failure(ErrorCode::new(
                        crate::SDK_POLLING_TIMEOUT,
                        "polling timed out",
                        format!("job at {location} did not finish within {timeout:?}"),
                    ));
                }
                Some(deadline) => interval.min(deadline - now),
                None => interval,
            };
            std::thread::sleep(pause);
        }
    }
}

/// Query encoding for GET/DELETE actions: scalars as-is, lists as repeated keys.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((name.clone(), scalar_string(item)));
                }
            }
            other => pairs.push((name.clone(), scalar_string(other))),
        }
    }
    pairs
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_from_body(status: u16, body: String) -> ErrorCode {
    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(&body) {
        return error;
    }
    ErrorCode::new(crate::SDK_HTTP_ERROR, format!("HTTP {status}"), body)
}

fn transport_failure(e: TransportError) -> ApiResult {
    warn!(error = %e, "transport failed");
    ApiResult::failure(ErrorCode::new(
        crate::SDK_INTERNAL_ERROR,
        "transport failed",
        e.to_string(),
    ))
}
