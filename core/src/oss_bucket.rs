//! `AddOssBucketFromRemote`: register an existing remote OSS bucket.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::{Action, RestInfo};
use crate::client::SESSION_ID;
use crate::http::HttpMethod;
use crate::param::{ParamConstraint, ParamSpec};
use crate::types::AddOssBucketFromRemoteResult;

/// Request fields. Unset fields are `None`; required ones are checked when
/// the action is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOssBucketFromRemoteAction {
    pub bucket_name: Option<String>,
    pub data_center_uuid: Option<String>,
    pub description: Option<String>,
    pub resource_uuid: Option<String>,
    pub system_tags: Option<Vec<String>>,
    pub user_tags: Option<Vec<String>>,
    pub session_id: Option<String>,
    #[serde(skip)]
    pub timeout: Option<Duration>,
    #[serde(skip)]
    pub polling_interval: Option<Duration>,
}

impl AddOssBucketFromRemoteAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_name(mut self, name: impl Into<String>) -> Self {
        self.bucket_name = Some(name.into());
        self
    }

    pub fn data_center_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.data_center_uuid = Some(uuid.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn resource_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.resource_uuid = Some(uuid.into());
        self
    }

    pub fn system_tags(mut self, tags: Vec<String>) -> Self {
        self.system_tags = Some(tags);
        self
    }

    pub fn user_tags(mut self, tags: Vec<String>) -> Self {
        self.user_tags = Some(tags);
        self
    }

    pub fn session_id(mut self, session: impl Into<String>) -> Self {
        self.session_id = Some(session.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(interval);
        self
    }
}

impl Action for AddOssBucketFromRemoteAction {
    type Value = AddOssBucketFromRemoteResult;

    const REST_INFO: RestInfo = RestInfo {
        http_method: HttpMethod::Post,
        path: "/hybrid/aliyun/oss-bucket",
        need_session: true,
        need_poll: true,
        parameter_name: "params",
    };

    const PARAMS: &'static [ParamSpec] = &[
        ParamSpec::new(
            "bucketName",
            ParamConstraint::REQUIRED.max_length(128).empty_string(false),
        ),
        ParamSpec::new("dataCenterUuid", ParamConstraint::REQUIRED),
        ParamSpec::new("description", ParamConstraint::OPTIONAL.max_length(1024)),
        ParamSpec::new("resourceUuid", ParamConstraint::OPTIONAL),
        ParamSpec::new("systemTags", ParamConstraint::OPTIONAL),
        ParamSpec::new("userTags", ParamConstraint::OPTIONAL),
        ParamSpec::new(SESSION_ID, ParamConstraint::REQUIRED),
    ];

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn polling_interval(&self) -> Option<Duration> {
        self.polling_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ValidationError;
    use crate::SdkClient;

    fn client() -> SdkClient {
        SdkClient::new(ClientConfig::default())
    }

    fn valid() -> AddOssBucketFromRemoteAction {
        AddOssBucketFromRemoteAction::new()
            .bucket_name("my-bucket")
            .data_center_uuid("dc-1")
            .session_id("sess-123")
    }

    #[test]
    fn builds_post_with_params_container() {
        let req = client().build_request(&valid()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/zstack/v1/hybrid/aliyun/oss-bucket");
        assert_eq!(req.header("Authorization"), Some("OAuth sess-123"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.query.is_empty());

        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"params": {"bucketName": "my-bucket", "dataCenterUuid": "dc-1"}})
        );
    }

    #[test]
    fn optional_fields_are_serialized_when_set() {
        let action = valid()
            .description("archive")
            .resource_uuid("r-1")
            .system_tags(vec!["sys::a".to_string()])
            .user_tags(vec!["team".to_string()]);
        let req = client().build_request(&action).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        let params = &body["params"];
        assert_eq!(params["description"], "archive");
        assert_eq!(params["resourceUuid"], "r-1");
        assert_eq!(params["systemTags"], serde_json::json!(["sys::a"]));
        assert_eq!(params["userTags"], serde_json::json!(["team"]));
        assert!(params.get("sessionId").is_none());
        assert!(params.get("timeout").is_none());
    }

    #[test]
    fn missing_bucket_name_is_rejected() {
        let action = AddOssBucketFromRemoteAction::new()
            .data_center_uuid("dc-1")
            .session_id("sess-123");
        assert_eq!(
            client().build_request(&action).unwrap_err(),
            ValidationError::MissingRequired("bucketName".to_string())
        );
    }

    #[test]
    fn empty_bucket_name_is_rejected() {
        let action = valid().bucket_name(" ");
        assert_eq!(
            client().build_request(&action).unwrap_err(),
            ValidationError::EmptyString("bucketName".to_string())
        );
    }

    #[test]
    fn bucket_name_length_limit() {
        assert!(client().build_request(&valid().bucket_name("b".repeat(128))).is_ok());
        assert!(matches!(
            client().build_request(&valid().bucket_name("b".repeat(129))),
            Err(ValidationError::TooLong { max: 128, .. })
        ));
    }

    #[test]
    fn empty_data_center_uuid_is_allowed() {
        let req = client().build_request(&valid().data_center_uuid("")).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["params"]["dataCenterUuid"], "");
    }

    #[test]
    fn missing_data_center_or_session_is_rejected() {
        let mut action = valid();
        action.data_center_uuid = None;
        assert_eq!(
            client().build_request(&action).unwrap_err(),
            ValidationError::MissingRequired("dataCenterUuid".to_string())
        );

        let mut action = valid();
        action.session_id = None;
        assert_eq!(
            client().build_request(&action).unwrap_err(),
            ValidationError::MissingRequired("sessionId".to_string())
        );
    }

    #[test]
    fn description_length_limit() {
        assert!(client().build_request(&valid().description("d".repeat(1024))).is_ok());
        assert!(client().build_request(&valid().description("d".repeat(1025))).is_err());
        assert!(client().build_request(&valid().description("")).is_ok());
    }

    #[test]
    fn per_call_timing_overrides_defaults() {
        let c = client();
        let call = c
            .prepare(
                &valid()
                    .with_timeout(Duration::from_secs(30))
                    .with_polling_interval(Duration::from_millis(200)),
            )
            .unwrap();
        assert!(call.need_poll);
        assert_eq!(call.timeout, Duration::from_secs(30));
        assert_eq!(call.polling_interval, Duration::from_millis(200));

        let call = c.prepare(&valid()).unwrap();
        assert_eq!(call.timeout, c.config().default_timeout);
    }
}
