//! Shared enums used across requests, responses, and stored entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a logical object or physical locator.
///
/// Rows are born `Pending` while a client-driven data-plane step is in
/// flight, move to `Ready` when the outcome is committed, and pass through
/// `PendingDeletion` on their way out. Any transition that requires `Ready`
/// treats every other status as the failure branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// A data-plane step has been started but not yet committed.
    Pending,
    /// The row is fully committed and visible to readers.
    Ready,
    /// A delete has been started but not yet committed.
    PendingDeletion,
}

impl Status {
    /// Returns the wire string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::PendingDeletion => "pending_deletion",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioning state of a logical bucket.
///
/// This is a genuine tri-state, not a nullable boolean: `Unset` means
/// versioning has never been touched and changes API semantics (version ids
/// are rejected, overwrites collapse onto the single live object). Once a
/// bucket leaves `Unset` it can only toggle between `Enabled` and
/// `Suspended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningState {
    /// Versioning has never been configured on the bucket.
    #[default]
    Unset,
    /// Every overwrite creates a new immutable version.
    Enabled,
    /// New writes carry the null-version marker and overwrite in place.
    Suspended,
}

impl VersioningState {
    /// Whether versioning has never been configured.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Whether version-specific requests are meaningful on this bucket.
    ///
    /// True for both `Enabled` and `Suspended`: once versioning has been
    /// touched, logical ids are exposed as version ids.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        !self.is_unset()
    }
}

/// Placement policy attached to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Write to the primary region and broadcast to warmup regions.
    Push,
    /// Write only to the client's own region.
    WriteLocal,
    /// Pull-through: add the client's region as a replica of an existing
    /// primary elsewhere.
    CopyOnRead,
}

impl PlacementPolicy {
    /// Returns the wire string for this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::WriteLocal => "write_local",
            Self::CopyOnRead => "copy_on_read",
        }
    }
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a delete request, decided in `start_delete_objects`
/// and echoed back by the client in `complete_delete_objects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOpType {
    /// A delete marker is inserted; prior versions are shadowed, not removed.
    Add,
    /// The existing null-version object is flipped to a delete marker in
    /// place.
    Replace,
    /// Physical rows are actually removed.
    Delete,
}

impl DeleteOpType {
    /// Returns the wire string for this op type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for DeleteOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
