//! Control-plane operation handlers.
//!
//! Each submodule exposes `handle_*` methods on
//! [`crate::provider::ControlPlane`], one per endpoint. Every handler runs
//! inside a single store transaction and emits at most one error; the HTTP
//! layer in `stratus-http` bridges them to the wire.

pub mod admin;
pub mod delete;
pub mod list;
pub mod locate;
pub mod metrics;
pub mod upload;

use stratus_model::{ControlError, VersioningState};

use crate::store::Database;

/// Fetch the versioning state of a bucket, or `NotFound` if the bucket is
/// not registered.
pub(crate) fn versioning_of(
    db: &Database,
    bucket: &str,
) -> Result<VersioningState, ControlError> {
    db.bucket(bucket)
        .map(|b| b.versioning)
        .ok_or_else(|| ControlError::not_found(format!("bucket {bucket}")))
}

/// The logical version id exposed to clients: present only once bucket
/// versioning has been touched.
pub(crate) fn exposed_version(versioning: VersioningState, id: u64) -> Option<u64> {
    versioning.is_touched().then_some(id)
}

/// Mint a control-plane multipart upload id.
pub(crate) fn new_upload_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
