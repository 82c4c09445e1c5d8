//! Stored entities.
//!
//! Ownership is one-directional: a logical bucket owns its physical bucket
//! locators inline, while logical objects and physical object locators are
//! separate rows related by id. Relations are fetched through explicit
//! selectors on the store, never by pointer traversal.

use chrono::{DateTime, Utc};
use stratus_model::{Status, VersioningState};

/// A logical bucket: the cloud-agnostic namespace clients address.
#[derive(Debug, Clone)]
pub struct LogicalBucket {
    /// Bucket name.
    pub bucket: String,
    /// Bucket lifecycle status.
    pub status: Status,
    /// Versioning state; starts `Unset` and never returns to it.
    pub versioning: VersioningState,
    /// Physical bucket locators; at least one, exactly one primary.
    pub locators: Vec<PhysicalBucketLocator>,
}

impl LogicalBucket {
    /// Find the physical bucket locator for a location tag.
    #[must_use]
    pub fn locator_for_tag(&self, tag: &str) -> Option<&PhysicalBucketLocator> {
        self.locators.iter().find(|pbl| pbl.location_tag == tag)
    }
}

/// One backing physical bucket in a single cloud region.
#[derive(Debug, Clone)]
pub struct PhysicalBucketLocator {
    /// Stable per-region tag; the join key between buckets and objects.
    pub location_tag: String,
    /// Cloud provider identifier.
    pub cloud: String,
    /// Region within the cloud.
    pub region: String,
    /// Physical bucket name in that cloud.
    pub bucket: String,
    /// Key prefix inside the physical bucket.
    pub prefix: String,
    /// Whether this locator is the bucket's single primary.
    pub is_primary: bool,
    /// Whether pushed writes eagerly replicate here.
    pub need_warmup: bool,
}

/// The versioned, cloud-agnostic identity of an object.
///
/// Multiple rows may share `(bucket, key)`; the one with the greatest `id`
/// is the latest, and `id` doubles as the exposed version id once bucket
/// versioning has been touched.
#[derive(Debug, Clone)]
pub struct LogicalObject {
    /// Store-assigned monotonic id; also the exposed version id.
    pub id: u64,
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Committed size in bytes; set at promotion to `Ready`.
    pub size: Option<u64>,
    /// Committed last-modified instant (naive UTC).
    pub last_modified: Option<DateTime<Utc>>,
    /// Committed ETag.
    pub etag: Option<String>,
    /// Lifecycle status.
    pub status: Status,
    /// Control-plane multipart upload id, when the write is multipart.
    pub multipart_upload_id: Option<String>,
    /// Whether this row is a delete marker.
    pub delete_marker: bool,
    /// Whether this row carries the null-version marker (written while
    /// versioning was suspended or unset); such rows are overwritten in
    /// place instead of accumulating versions.
    pub version_suspended: bool,
}

/// One replica of a logical object in a single cloud region.
#[derive(Debug, Clone)]
pub struct PhysicalObjectLocator {
    /// Store-assigned locator id.
    pub id: u64,
    /// Owning logical object id (back-reference by id).
    pub logical_object_id: u64,
    /// Location tag; unique among the siblings of one logical object.
    pub location_tag: String,
    /// Cloud provider identifier.
    pub cloud: String,
    /// Region within the cloud.
    pub region: String,
    /// Physical bucket name.
    pub bucket: String,
    /// Physical key (bucket prefix + logical key).
    pub key: String,
    /// Opaque version id assigned by the backing cloud, once committed.
    pub version_id: Option<String>,
    /// Lifecycle status.
    pub status: Status,
    /// Whether this is the authoritative replica; at most one per object.
    pub is_primary: bool,
    /// Advisory lock timestamp; set exactly while the row is `Pending` or
    /// `PendingDeletion` so an out-of-band janitor can reap stuck rows.
    pub lock_acquired_ts: Option<DateTime<Utc>>,
    /// Cloud-native multipart upload id for this region, if any.
    pub multipart_upload_id: Option<String>,
}

/// One committed multipart part, attached to either a logical object or a
/// physical locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    /// Part number (1-based).
    pub part_number: u32,
    /// ETag of the part.
    pub etag: String,
    /// Size of the part in bytes.
    pub size: u64,
}

/// One append-only statistics record.
#[derive(Debug, Clone)]
pub struct StatisticsRecord {
    /// Region the request was served from.
    pub requested_region: String,
    /// Region the client called from.
    pub client_region: String,
    /// Operation name.
    pub operation: String,
    /// Observed latency in seconds.
    pub latency: f64,
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
    /// Size of the object involved, in bytes.
    pub object_size: u64,
}
