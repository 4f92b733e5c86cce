use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_ROOT: &str = "/zstack/v1";

/// Number of polls answered with 202 before a job reports its outcome.
pub const PENDING_POLLS: u32 = 1;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OssBucketInventory {
    pub uuid: String,
    pub bucket_name: String,
    pub data_center_uuid: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorCode {
    pub code: String,
    pub description: String,
    pub details: String,
}

#[derive(Deserialize)]
pub struct AddOssBucketRequest {
    pub params: AddOssBucketParams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOssBucketParams {
    pub bucket_name: Option<String>,
    pub data_center_uuid: Option<String>,
    pub description: Option<String>,
    pub resource_uuid: Option<String>,
    #[serde(default)]
    pub system_tags: Vec<String>,
    #[serde(default)]
    pub user_tags: Vec<String>,
}

#[derive(Clone, Debug)]
enum Outcome {
    Added(OssBucketInventory),
    Failed(ErrorCode),
}

#[derive(Clone, Debug)]
struct Job {
    polls_left: u32,
    outcome: Outcome,
}

#[derive(Default)]
pub struct Store {
    buckets: HashMap<String, OssBucketInventory>,
    jobs: HashMap<Uuid, Job>,
}

pub type Db = Arc<RwLock<Store>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(
            &format!("{API_ROOT}/hybrid/aliyun/oss-bucket"),
            post(add_oss_bucket),
        )
        .route(&format!("{API_ROOT}/api-jobs/{{uuid}}"), get(get_job))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_reply(status: StatusCode, code: &str, description: &str, details: String) -> Reply {
    let error = ErrorCode {
        code: code.to_string(),
        description: description.to_string(),
        details,
    };
    (status, Json(json!({ "error": error })))
}

async fn add_oss_bucket(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AddOssBucketRequest>,
) -> Reply {
    let session = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("OAuth "))
        .filter(|s| !s.trim().is_empty());
    if session.is_none() {
        return error_reply(
            StatusCode::UNAUTHORIZED,
            "ID.1001",
            "invalid session",
            "missing or malformed Authorization header".to_string(),
        );
    }

    let params = input.params;
    let (Some(bucket_name), Some(data_center_uuid)) = (params.bucket_name, params.data_center_uuid)
    else {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "SYS.1007",
            "invalid argument",
            "bucketName and dataCenterUuid are mandatory".to_string(),
        );
    };

    let mut store = db.write().await;
    let outcome = if store.buckets.contains_key(&bucket_name) {
        Outcome::Failed(ErrorCode {
            code: "Bucket.AlreadyExists".to_string(),
            description: "bucket already added".to_string(),
            details: format!("bucket [{bucket_name}] has been added to this data center"),
        })
    } else {
        let inventory = OssBucketInventory {
            uuid: params
                .resource_uuid
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            bucket_name: bucket_name.clone(),
            data_center_uuid,
            description: params.description,
        };
        store.buckets.insert(bucket_name, inventory.clone());
        Outcome::Added(inventory)
    };

    let job_id = Uuid::new_v4();
    store.jobs.insert(
        job_id,
        Job {
            polls_left: PENDING_POLLS,
            outcome,
        },
    );
    tracing::debug!(%job_id, "accepted add-bucket job");

    (
        StatusCode::ACCEPTED,
        Json(json!({ "location": job_location(&headers, job_id) })),
    )
}

async fn get_job(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Reply {
    let mut store = db.write().await;
    let Some(job) = store.jobs.get_mut(&id) else {
        return error_reply(
            StatusCode::NOT_FOUND,
            "SYS.1006",
            "resource not found",
            format!("no job [{id}]"),
        );
    };

    if job.polls_left > 0 {
        job.polls_left -= 1;
        return (
            StatusCode::ACCEPTED,
            Json(json!({ "location": job_location(&headers, id) })),
        );
    }

    match store.jobs.remove(&id).map(|job| job.outcome) {
        Some(Outcome::Added(inventory)) => (StatusCode::OK, Json(json!({ "inventory": inventory }))),
        Some(Outcome::Failed(error)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": error })),
        ),
        None => error_reply(
            StatusCode::NOT_FOUND,
            "SYS.1006",
            "resource not found",
            format!("no job [{id}]"),
        ),
    }
}

fn job_location(headers: &HeaderMap, id: Uuid) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{API_ROOT}/api-jobs/{id}")
}
