//! Response DTOs.
//!
//! Every field has a default so a partial server payload still decodes.

use serde::{Deserialize, Serialize};

/// An object-storage bucket registered with a data center.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OssBucketInventory {
    pub uuid: String,
    pub bucket_name: String,
    pub data_center_uuid: String,
    pub region_name: Option<String>,
    pub description: Option<String>,
    pub current: Option<String>,
    pub create_date: Option<String>,
    pub last_op_date: Option<String>,
}

/// Payload of a successful `AddOssBucketFromRemote` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddOssBucketFromRemoteResult {
    pub inventory: Option<OssBucketInventory>,
}
