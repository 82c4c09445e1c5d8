//! Provisioning surface.
//!
//! Bucket lifecycle is owned by an external provisioner; these two hooks
//! are its interface into the control plane and carry no placement logic.

use tracing::info;

use stratus_model::request::{RegisterBucketRequest, SetVersioningRequest};
use stratus_model::{ControlError, Status, VersioningState};

use crate::entities::{LogicalBucket, PhysicalBucketLocator};
use crate::provider::ControlPlane;

impl ControlPlane {
    /// Register a logical bucket with its physical bucket locators.
    pub fn handle_register_bucket(
        &self,
        req: RegisterBucketRequest,
    ) -> Result<(), ControlError> {
        if req.locators.is_empty() {
            return Err(ControlError::invalid_request(
                "a bucket requires at least one physical bucket locator",
            ));
        }
        let primaries = req.locators.iter().filter(|l| l.is_primary).count();
        if primaries != 1 {
            return Err(ControlError::invalid_request(format!(
                "a bucket requires exactly one primary physical bucket locator, got {primaries}",
            )));
        }

        let mut txn = self.store.begin_immediate();
        if txn.bucket(&req.bucket).is_some() {
            return Err(ControlError::conflict(format!(
                "bucket {} already exists",
                req.bucket,
            )));
        }
        let locators: Vec<PhysicalBucketLocator> = req
            .locators
            .into_iter()
            .map(|l| PhysicalBucketLocator {
                location_tag: l.location_tag,
                cloud: l.cloud,
                region: l.region,
                bucket: l.bucket,
                prefix: l.prefix,
                is_primary: l.is_primary,
                need_warmup: l.need_warmup,
            })
            .collect();
        info!(bucket = %req.bucket, regions = locators.len(), "registering bucket");
        txn.insert_bucket(LogicalBucket {
            bucket: req.bucket,
            status: Status::Ready,
            versioning: VersioningState::Unset,
            locators,
        });
        txn.commit();
        Ok(())
    }

    /// Enable or suspend bucket versioning. Once a bucket leaves `Unset`
    /// it never returns to it.
    pub fn handle_set_versioning(
        &self,
        req: SetVersioningRequest,
    ) -> Result<(), ControlError> {
        let mut txn = self.store.begin_immediate();
        let Some(bucket) = txn.bucket_mut(&req.bucket) else {
            return Err(ControlError::not_found(format!("bucket {}", req.bucket)));
        };
        bucket.versioning = if req.enabled {
            VersioningState::Enabled
        } else {
            VersioningState::Suspended
        };
        info!(bucket = %req.bucket, enabled = req.enabled, "changed bucket versioning");
        txn.commit();
        Ok(())
    }
}
