//! Version-policy decisions.
//!
//! Pure functions reproducing S3's versioning rules: given the bucket's
//! versioning state and the latest existing object, decide whether an
//! upload reuses the existing logical object, clones a new version, or
//! creates a fresh one, and how a delete request is classified.

use stratus_model::{DeleteOpType, PlacementPolicy, VersioningState};

use crate::entities::LogicalObject;

/// How `start_upload` treats the logical object row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDisposition {
    /// No existing object: create a brand-new pending row.
    CreateFresh {
        /// Whether the new row carries the null-version marker.
        version_suspended: bool,
    },
    /// Create a new row cloning the existing object's metadata; the new id
    /// becomes the new version.
    CloneNew {
        /// Whether the new row carries the null-version marker.
        version_suspended: bool,
    },
    /// Reuse the existing logical object row (new locators only, or a
    /// null-version overwrite).
    Reuse,
}

/// Decide how an upload maps onto logical object rows.
#[must_use]
pub fn upload_disposition(
    versioning: VersioningState,
    existing: Option<&LogicalObject>,
    policy: PlacementPolicy,
) -> UploadDisposition {
    let Some(existing) = existing else {
        return UploadDisposition::CreateFresh {
            version_suspended: versioning == VersioningState::Suspended,
        };
    };

    // Pull-through replication never mints versions.
    if policy == PlacementPolicy::CopyOnRead {
        return UploadDisposition::Reuse;
    }

    match versioning {
        VersioningState::Unset => UploadDisposition::Reuse,
        VersioningState::Enabled => UploadDisposition::CloneNew {
            version_suspended: false,
        },
        VersioningState::Suspended => {
            if existing.version_suspended {
                // The null version is overwritten in place.
                UploadDisposition::Reuse
            } else {
                UploadDisposition::CloneNew {
                    version_suspended: true,
                }
            }
        }
    }
}

/// Classify a delete request for one key.
///
/// Explicit version ids always delete rows. A simple delete inserts a
/// marker on versioning-enabled buckets, flips the null version in place on
/// suspended buckets whose latest already carries the null-version marker,
/// and removes the object outright on unversioned buckets.
#[must_use]
pub fn delete_disposition(
    versioning: VersioningState,
    latest_version_suspended: bool,
    has_explicit_versions: bool,
) -> DeleteOpType {
    if has_explicit_versions {
        return DeleteOpType::Delete;
    }
    match versioning {
        VersioningState::Enabled => DeleteOpType::Add,
        VersioningState::Suspended => {
            if latest_version_suspended {
                DeleteOpType::Replace
            } else {
                DeleteOpType::Add
            }
        }
        VersioningState::Unset => DeleteOpType::Delete,
    }
}
