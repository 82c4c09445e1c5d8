//! Control-plane error type.
//!
//! [`ControlError`] enumerates the error kinds the control plane can emit.
//! Each handler runs inside a single store transaction and produces at most
//! one of these; any error rolls the transaction back. The HTTP layer maps
//! kinds to status codes through [`ControlError::status_code`].

use http::StatusCode;

/// Error kinds emitted by control-plane operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// The caller supplied a version id (or asked for version-specific
    /// behavior) on a bucket whose versioning has never been configured.
    #[error("versioning is not enabled: {reason}")]
    VersioningNotEnabled {
        /// What the caller attempted.
        reason: String,
    },

    /// Parallel request arrays differ in length.
    #[error("mismatched lengths: {reason}")]
    LengthMismatch {
        /// Which arrays disagreed.
        reason: String,
    },

    /// The request body or a request field could not be interpreted.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// What was malformed.
        reason: String,
    },

    /// The target bucket, object, locator, or copy source does not exist.
    #[error("not found: {entity}")]
    NotFound {
        /// The entity that was missing.
        entity: String,
    },

    /// The caller addressed a delete marker in a way S3 forbids.
    #[error("not allowed to access a delete marker: {key}")]
    DeleteMarkerNotAllowed {
        /// The key whose delete marker was addressed.
        key: String,
    },

    /// The requested state transition is forbidden from the current state.
    #[error("conflict: {reason}")]
    Conflict {
        /// Why the transition was rejected.
        reason: String,
    },

    /// A bucket-shape invariant does not hold (e.g. no primary physical
    /// bucket locator). Surfaced as a server error, never a panic.
    #[error("bucket configuration invariant violated: {reason}")]
    Configuration {
        /// The violated invariant.
        reason: String,
    },

    /// The entity store failed to commit; the caller may retry.
    #[error("transient store failure: {reason}")]
    TransientStore {
        /// The underlying failure.
        reason: String,
    },
}

impl ControlError {
    /// Short machine-readable kind string for the error response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VersioningNotEnabled { .. } => "versioning_not_enabled",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::NotFound { .. } => "not_found",
            Self::DeleteMarkerNotAllowed { .. } => "delete_marker_not_allowed",
            Self::Conflict { .. } => "conflict",
            Self::Configuration { .. } => "configuration_error",
            Self::TransientStore { .. } => "transient_store_error",
        }
    }

    /// The HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::VersioningNotEnabled { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DeleteMarkerNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Configuration { .. } | Self::TransientStore { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // -- Convenience constructors --

    /// Versioning-not-enabled error.
    #[must_use]
    pub fn versioning_not_enabled(reason: impl Into<String>) -> Self {
        Self::VersioningNotEnabled {
            reason: reason.into(),
        }
    }

    /// Length-mismatch error.
    #[must_use]
    pub fn length_mismatch(reason: impl Into<String>) -> Self {
        Self::LengthMismatch {
            reason: reason.into(),
        }
    }

    /// Invalid-request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Not-found error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Delete-marker-not-allowed error.
    #[must_use]
    pub fn delete_marker(key: impl Into<String>) -> Self {
        Self::DeleteMarkerNotAllowed { key: key.into() }
    }

    /// Conflict error.
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// Configuration-invariant error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Transient store error.
    #[must_use]
    pub fn transient_store(reason: impl Into<String>) -> Self {
        Self::TransientStore {
            reason: reason.into(),
        }
    }
}
