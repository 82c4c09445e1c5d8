//! Control-plane operation enum.
//!
//! Every endpoint is a fixed method + path pair with a JSON body; the
//! router resolves incoming requests to one of these variants.

use std::fmt;

use http::Method;

/// All control-plane operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Upload protocol
    /// Begin a two-phase upload: version policy + placement.
    StartUpload,
    /// Commit the outcome of a data-plane write on one locator.
    CompleteUpload,
    /// Record the cloud-native multipart upload id on one locator.
    SetMultipartId,
    /// Upsert a completed part on one locator.
    AppendPart,
    /// Read back the locators (and parts) of a pending multipart upload.
    ContinueUpload,

    // Delete protocol
    /// Begin a two-phase delete: classify and stage per-key operations.
    StartDeleteObjects,
    /// Commit the staged delete operations.
    CompleteDeleteObjects,

    // Read paths
    /// Pick the physical locator a client should read from.
    LocateObject,
    /// Return logical metadata for the latest (or a specific) version.
    HeadObject,
    /// Stage pull-through replication into warmup regions.
    StartWarmup,
    /// Report physical locator statuses for a key.
    LocateObjectStatus,
    /// List the latest live object per key.
    ListObjects,
    /// List every ready version.
    ListObjectsVersioning,
    /// List in-flight multipart uploads under a prefix.
    ListMultipartUploads,
    /// List the committed parts of one multipart upload.
    ListParts,

    // Metrics sink
    /// Append one statistics record.
    RecordMetrics,
    /// List statistics records for a client region.
    ListMetrics,

    // Provisioning surface
    /// Register a logical bucket with its physical bucket locators.
    RegisterBucket,
    /// Enable or suspend bucket versioning.
    SetVersioning,

    /// Liveness probe.
    Health,
}

impl Operation {
    /// Resolve an operation from an HTTP method and request path.
    #[must_use]
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        if *method == Method::POST {
            return match path {
                "/start_upload" => Some(Self::StartUpload),
                "/continue_upload" => Some(Self::ContinueUpload),
                "/start_delete_objects" => Some(Self::StartDeleteObjects),
                "/locate_object" => Some(Self::LocateObject),
                "/head_object" => Some(Self::HeadObject),
                "/start_warmup" => Some(Self::StartWarmup),
                "/locate_object_status" => Some(Self::LocateObjectStatus),
                "/list_objects" => Some(Self::ListObjects),
                "/list_objects_versioning" => Some(Self::ListObjectsVersioning),
                "/list_multipart_uploads" => Some(Self::ListMultipartUploads),
                "/list_parts" => Some(Self::ListParts),
                "/record_metrics" => Some(Self::RecordMetrics),
                "/list_metrics" => Some(Self::ListMetrics),
                "/register_bucket" => Some(Self::RegisterBucket),
                "/set_versioning" => Some(Self::SetVersioning),
                _ => None,
            };
        }
        if *method == Method::PATCH {
            return match path {
                "/complete_upload" => Some(Self::CompleteUpload),
                "/set_multipart_id" => Some(Self::SetMultipartId),
                "/append_part" => Some(Self::AppendPart),
                "/complete_delete_objects" => Some(Self::CompleteDeleteObjects),
                _ => None,
            };
        }
        if *method == Method::GET && path == "/healthz" {
            return Some(Self::Health);
        }
        None
    }

    /// Returns the canonical name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartUpload => "start_upload",
            Self::CompleteUpload => "complete_upload",
            Self::SetMultipartId => "set_multipart_id",
            Self::AppendPart => "append_part",
            Self::ContinueUpload => "continue_upload",
            Self::StartDeleteObjects => "start_delete_objects",
            Self::CompleteDeleteObjects => "complete_delete_objects",
            Self::LocateObject => "locate_object",
            Self::HeadObject => "head_object",
            Self::StartWarmup => "start_warmup",
            Self::LocateObjectStatus => "locate_object_status",
            Self::ListObjects => "list_objects",
            Self::ListObjectsVersioning => "list_objects_versioning",
            Self::ListMultipartUploads => "list_multipart_uploads",
            Self::ListParts => "list_parts",
            Self::RecordMetrics => "record_metrics",
            Self::ListMetrics => "list_metrics",
            Self::RegisterBucket => "register_bucket",
            Self::SetVersioning => "set_versioning",
            Self::Health => "healthz",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
