//! The request/response contract shared by every API action.
//!
//! # Design
//! An action is a plain `Serialize` struct holding its request fields plus
//! two associated constants: its `RestInfo` binding and its `ParamSpec`
//! table. Everything else (validation, request building, polling, result
//! conversion) is generic and lives in the default methods below and in
//! `SdkClient`.
//!
//! Validation failures come back as `Err` before any I/O. Once a request is
//! on the wire, every outcome is an `ActionResult`, including transport
//! failures.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::client::SdkClient;
use crate::error::ValidationError;
use crate::http::HttpMethod;
use crate::param::ParamSpec;
use crate::result::{ActionResult, ApiResult, ErrorCode};
use crate::transport::Transport;

/// How an action binds to its HTTP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestInfo {
    pub http_method: HttpMethod,
    /// Path below the API root, e.g. `/hybrid/aliyun/oss-bucket`.
    pub path: &'static str,
    pub need_session: bool,
    /// The server answers with a job handle that has to be polled.
    pub need_poll: bool,
    /// Name of the body container holding the parameters.
    pub parameter_name: &'static str,
}

pub trait Action: Serialize {
    type Value: DeserializeOwned + Default + Send + 'static;

    const REST_INFO: RestInfo;
    const PARAMS: &'static [ParamSpec];

    /// Per-call override of `ClientConfig::default_timeout`.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Per-call override of `ClientConfig::default_polling_interval`.
    fn polling_interval(&self) -> Option<Duration> {
        None
    }

    /// The unvalidated parameter map, keyed by wire name.
    fn params(&self) -> Result<Map<String, Value>, ValidationError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ValidationError::Serialization(format!(
                "expected an object, got {other}"
            ))),
            Err(e) => Err(ValidationError::Serialization(e.to_string())),
        }
    }

    fn make_result(res: &ApiResult) -> ActionResult<Self::Value> {
        ActionResult::from_api_result(res)
    }

    /// Validate, submit and block until the call completes.
    fn call<T: Transport>(
        &self,
        client: &SdkClient<T>,
    ) -> Result<ActionResult<Self::Value>, ValidationError>
    where
        Self: Sized,
    {
        let prepared = client.prepare(self)?;
        Ok(Self::make_result(&client.dispatch(prepared)))
    }

    /// Validate now, then run the call in the background.
    ///
    /// The call runs on Tokio's blocking pool when a runtime is current and
    /// on a dedicated thread otherwise. The returned future resolves exactly
    /// once, after the transport is done.
    fn call_async<T: Transport + 'static>(
        &self,
        client: &SdkClient<T>,
    ) -> Result<PendingCall<Self::Value>, ValidationError>
    where
        Self: Sized + 'static,
    {
        let prepared = client.prepare(self)?;
        let client = client.clone();
        let (tx, rx) = oneshot::channel();
        spawn_call(move || {
            // The caller may have dropped the future; nothing to deliver to.
            let _ = tx.send(Self::make_result(&client.dispatch(prepared)));
        });
        Ok(PendingCall { rx })
    }

    /// Callback form of `call_async`. `completion` runs exactly once, off the
    /// calling thread, after the transport is done.
    fn call_with<T, F>(&self, client: &SdkClient<T>, completion: F) -> Result<(), ValidationError>
    where
        Self: Sized + 'static,
        T: Transport + 'static,
        F: FnOnce(ActionResult<Self::Value>) + Send + 'static,
    {
        let prepared = client.prepare(self)?;
        let client = client.clone();
        spawn_call(move || completion(Self::make_result(&client.dispatch(prepared))));
        Ok(())
    }
}

fn spawn_call<F: FnOnce() + Send + 'static>(job: F) {
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(job);
        }
        Err(_) => {
            std::thread::spawn(job);
        }
    }
}

/// Future returned by `Action::call_async`.
#[derive(Debug)]
pub struct PendingCall<V> {
    rx: oneshot::Receiver<ActionResult<V>>,
}

impl<V> Future for PendingCall<V> {
    type Output = ActionResult<V>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(ActionResult {
                error: Some(ErrorCode::new(
                    crate::SDK_INTERNAL_ERROR,
                    "call task did not complete",
                    e.to_string(),
                )),
                value: None,
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}
