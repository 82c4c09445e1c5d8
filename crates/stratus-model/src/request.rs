//! Request bodies for every control-plane endpoint.
//!
//! Version ids on the wire are the store-assigned logical object ids
//! (`u64`); the opaque per-cloud version strings only ever travel in the
//! opposite direction, inside responses and `complete_upload`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DeleteOpType, PlacementPolicy};

/// Begin a two-phase upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartUploadRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Region tag the client is calling from.
    pub client_from_region: String,
    /// Placement policy for this upload.
    pub policy: PlacementPolicy,
    /// Whether this upload is multipart.
    #[serde(default)]
    pub is_multipart: bool,
    /// Specific version to reuse or copy from; requires versioning.
    #[serde(default)]
    pub version_id: Option<u64>,
    /// Server-side copy source bucket.
    #[serde(default)]
    pub copy_src_bucket: Option<String>,
    /// Server-side copy source key.
    #[serde(default)]
    pub copy_src_key: Option<String>,
}

/// Commit the outcome of a data-plane write on one physical locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteUploadRequest {
    /// Physical locator id returned by `start_upload`.
    pub id: u64,
    /// Opaque version id assigned by the backing cloud, if any.
    #[serde(default)]
    pub version_id: Option<String>,
    /// Object size in bytes.
    pub size: u64,
    /// ETag reported by the backing cloud.
    pub etag: String,
    /// Last-modified instant; any offset is normalized to UTC.
    pub last_modified: DateTime<Utc>,
    /// Placement policy the upload was started with.
    pub policy: PlacementPolicy,
}

/// Record the cloud-native multipart upload id on one locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetMultipartIdRequest {
    /// Physical locator id.
    pub id: u64,
    /// Upload id assigned by the backing cloud for that region.
    pub multipart_upload_id: String,
}

/// Upsert one completed multipart part on a locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendPartRequest {
    /// Physical locator id.
    pub id: u64,
    /// Part number (1-based).
    pub part_number: u32,
    /// ETag of the uploaded part.
    pub etag: String,
    /// Size of the part in bytes.
    pub size: u64,
}

/// Read back the locators of a pending multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueUploadRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Control-plane multipart upload id from `start_upload`.
    pub multipart_upload_id: String,
    /// Whether to include each locator's committed parts.
    #[serde(default)]
    pub do_list_parts: bool,
    /// `upload_part_copy` source bucket.
    #[serde(default)]
    pub copy_src_bucket: Option<String>,
    /// `upload_part_copy` source key.
    #[serde(default)]
    pub copy_src_key: Option<String>,
    /// Specific source version for `upload_part_copy`.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// Begin a two-phase delete for a batch of keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteObjectsRequest {
    /// Target bucket.
    pub bucket: String,
    /// Per-key version ids to delete; an empty list means a simple delete
    /// of the latest version.
    pub object_identifiers: BTreeMap<String, Vec<u64>>,
    /// Optional per-key multipart upload ids (aborts in-flight uploads);
    /// parallel to `object_identifiers` iteration order.
    #[serde(default)]
    pub multipart_upload_ids: Option<Vec<String>>,
}

/// Commit staged delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteDeleteObjectsRequest {
    /// Physical locator ids the client acted on.
    pub ids: Vec<u64>,
    /// Optional parallel multipart upload ids.
    #[serde(default)]
    pub multipart_upload_ids: Option<Vec<String>>,
    /// Parallel op types echoed from `start_delete_objects`.
    pub op_type: Vec<DeleteOpType>,
}

/// Pick the physical locator a client should read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateObjectRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Region tag the client is calling from.
    pub client_from_region: String,
    /// Specific version to locate; requires versioning.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// Return logical metadata for the latest (or a specific) version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadObjectRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Specific version to inspect; requires versioning.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// Stage pull-through replication into warmup regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartWarmupRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Region tags to replicate into.
    pub warmup_regions: Vec<String>,
    /// Specific version to warm up; requires versioning.
    #[serde(default)]
    pub version_id: Option<u64>,
}

/// List objects (or versions, or multipart uploads) in a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListObjectsRequest {
    /// Target bucket.
    pub bucket: String,
    /// Only keys starting with this prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Only keys strictly greater than this one.
    #[serde(default)]
    pub start_after: Option<String>,
    /// Maximum number of entries to return.
    #[serde(default)]
    pub max_keys: Option<usize>,
}

/// List the committed logical parts of one multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPartsRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target key.
    pub key: String,
    /// Control-plane multipart upload id.
    pub upload_id: String,
    /// Restrict to a single part number.
    #[serde(default)]
    pub part_number: Option<u32>,
}

/// Append one statistics record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetricsRequest {
    /// Region the request was served from.
    pub requested_region: String,
    /// Region the client called from.
    pub client_region: String,
    /// Operation name the measurement belongs to.
    pub operation: String,
    /// Observed latency in seconds.
    pub latency: f64,
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
    /// Size of the object involved, in bytes.
    pub object_size: u64,
}

/// List statistics records for one client region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMetricsRequest {
    /// Client region to filter on.
    pub client_region: String,
}

/// One physical bucket locator in a `register_bucket` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketLocatorConfig {
    /// Stable per-region tag joining buckets to objects.
    pub location_tag: String,
    /// Cloud provider identifier.
    pub cloud: String,
    /// Region within the cloud.
    pub region: String,
    /// Physical bucket name in that cloud.
    pub bucket: String,
    /// Key prefix inside the physical bucket.
    #[serde(default)]
    pub prefix: String,
    /// Whether this locator is the bucket's single primary.
    #[serde(default)]
    pub is_primary: bool,
    /// Whether pushed writes should eagerly replicate here.
    #[serde(default)]
    pub need_warmup: bool,
}

/// Register a logical bucket with its physical bucket locators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBucketRequest {
    /// Bucket name.
    pub bucket: String,
    /// Physical bucket locators; exactly one must be primary.
    pub locators: Vec<BucketLocatorConfig>,
}

/// Enable or suspend bucket versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVersioningRequest {
    /// Bucket name.
    pub bucket: String,
    /// `true` enables versioning, `false` suspends it.
    pub enabled: bool,
}
