//! Response bodies for every control-plane endpoint.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DeleteOpType, Status};

/// One physical locator handed to a client for a data-plane step.
///
/// The same shape serves reads (`locate_object`), upload staging
/// (`start_upload`), warmups, and delete staging; fields that do not apply
/// to an operation are simply null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateObjectResponse {
    /// Physical locator id; echoed back in the matching `complete_*` call.
    pub id: u64,
    /// Location tag of the locator's region.
    pub tag: String,
    /// Cloud provider identifier.
    pub cloud: String,
    /// Physical bucket name.
    pub bucket: String,
    /// Region within the cloud.
    pub region: String,
    /// Physical key (bucket prefix + logical key).
    pub key: String,
    /// Logical object size, when committed.
    #[serde(default)]
    pub size: Option<u64>,
    /// Logical last-modified instant, when committed.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Logical ETag, when committed.
    #[serde(default)]
    pub etag: Option<String>,
    /// Cloud-native multipart upload id on this locator, if any.
    #[serde(default)]
    pub multipart_upload_id: Option<String>,
    /// Opaque cloud-native version id the client should operate on.
    #[serde(default)]
    pub version_id: Option<String>,
    /// Logical version id, exposed only once bucket versioning has been
    /// touched.
    #[serde(default)]
    pub version: Option<u64>,
}

/// Response to `start_upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartUploadResponse {
    /// Control-plane multipart upload id, when the upload is multipart.
    #[serde(default)]
    pub multipart_upload_id: Option<String>,
    /// Locators the client must write to.
    pub locators: Vec<LocateObjectResponse>,
    /// Per-locator copy source buckets for server-side copies.
    #[serde(default)]
    pub copy_src_buckets: Vec<String>,
    /// Per-locator copy source keys for server-side copies.
    #[serde(default)]
    pub copy_src_keys: Vec<String>,
}

/// One committed part in a `continue_upload` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueUploadPhysicalPart {
    /// Part number (1-based).
    pub part_number: u32,
    /// ETag of the part.
    pub etag: String,
}

/// One sibling locator of a pending multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueUploadResponse {
    /// Physical locator id.
    pub id: u64,
    /// Location tag.
    pub tag: String,
    /// Cloud provider identifier.
    pub cloud: String,
    /// Physical bucket name.
    pub bucket: String,
    /// Region within the cloud.
    pub region: String,
    /// Physical key.
    pub key: String,
    /// Cloud-native multipart upload id recorded on the locator.
    #[serde(default)]
    pub multipart_upload_id: Option<String>,
    /// Opaque cloud-native version id, if committed.
    #[serde(default)]
    pub version_id: Option<String>,
    /// Committed parts, present when `do_list_parts` was set.
    #[serde(default)]
    pub parts: Option<Vec<ContinueUploadPhysicalPart>>,
    /// Copy source bucket for `upload_part_copy`, aligned per locator.
    #[serde(default)]
    pub copy_src_bucket: Option<String>,
    /// Copy source key for `upload_part_copy`, aligned per locator.
    #[serde(default)]
    pub copy_src_key: Option<String>,
}

/// Delete-marker summary for one key in a `start_delete_objects` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMarkerInfo {
    /// Whether the affected latest object is (now) a delete marker.
    pub delete_marker: bool,
    /// Logical version id of the marker, unless the bucket is unversioned
    /// or the object carries the null-version marker.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// Response to `start_delete_objects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteObjectsResponse {
    /// Per-key physical locators the client should act on.
    pub locators: BTreeMap<String, Vec<LocateObjectResponse>>,
    /// Per-key delete-marker summaries.
    pub delete_markers: BTreeMap<String, DeleteMarkerInfo>,
    /// Per-key operation classification.
    pub op_type: BTreeMap<String, DeleteOpType>,
}

/// Response to `start_warmup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartWarmupResponse {
    /// The primary locator to read from.
    pub src_locator: LocateObjectResponse,
    /// Freshly staged destination locators, one per warmup region.
    pub dst_locators: Vec<LocateObjectResponse>,
}

/// One object row in a listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectResponse {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Object size, when committed.
    #[serde(default)]
    pub size: Option<u64>,
    /// ETag, when committed.
    #[serde(default)]
    pub etag: Option<String>,
    /// Last-modified instant, when committed.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Logical version id; present only in versioned listings.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// Response to `head_object`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadObjectResponse {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Object size.
    #[serde(default)]
    pub size: Option<u64>,
    /// ETag.
    #[serde(default)]
    pub etag: Option<String>,
    /// Last-modified instant.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Logical version id, exposed once versioning has been touched.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// One in-flight multipart upload in a listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartResponse {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Control-plane multipart upload id.
    pub upload_id: String,
}

/// One committed logical part in a `list_parts` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalPartResponse {
    /// Part number (1-based).
    pub part_number: u32,
    /// ETag of the part.
    pub etag: String,
    /// Size of the part in bytes.
    pub size: u64,
}

/// One physical locator status in a `locate_object_status` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStatusResponse {
    /// Current locator status.
    pub status: Status,
}

/// One statistics record in a `list_metrics` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRecordResponse {
    /// Region the client called from.
    pub client_region: String,
    /// Region the request was served from.
    pub requested_region: String,
    /// Operation name.
    pub operation: String,
    /// Observed latency in seconds.
    pub latency: f64,
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
    /// Size of the object involved, in bytes.
    pub object_size: u64,
}

/// Response to `list_metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMetricsResponse {
    /// Matching records.
    pub metrics: Vec<MetricsRecordResponse>,
    /// Number of matching records.
    pub count: usize,
}
