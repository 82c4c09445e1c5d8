//! Read and locate paths.
//!
//! Pure read paths with one exception: `start_warmup` stages new pending
//! locators for pull-through replication.

use chrono::Utc;
use tracing::debug;

use stratus_model::request::{HeadObjectRequest, LocateObjectRequest, StartWarmupRequest};
use stratus_model::response::{
    HeadObjectResponse, LocateObjectResponse, ObjectStatusResponse, StartWarmupResponse,
};
use stratus_model::{ControlError, Status};

use crate::entities::{LogicalObject, PhysicalObjectLocator};
use crate::provider::ControlPlane;

use super::{exposed_version, versioning_of};

impl ControlPlane {
    /// Pick the physical locator a client should read from.
    ///
    /// Tiebreak: an exact client-region match wins, otherwise the primary.
    pub fn handle_locate_object(
        &self,
        req: LocateObjectRequest,
    ) -> Result<LocateObjectResponse, ControlError> {
        let txn = self.store.begin_read();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        // The newest ready logical object that has at least one ready
        // locator (or the exact version, when addressed).
        let rows = txn.objects_for_key(&req.bucket, &req.key, &[Status::Ready]);
        let object: Option<&LogicalObject> = rows
            .iter()
            .copied()
            .filter(|o| req.version_id.is_none_or(|vid| o.id == vid))
            .find(|o| {
                txn.locators_of(o.id)
                    .iter()
                    .any(|l| l.status == Status::Ready)
            });

        let Some(object) = object else {
            return Err(ControlError::not_found(format!(
                "object {}/{}",
                req.bucket, req.key,
            )));
        };
        if object.delete_marker {
            if req.version_id.is_none() {
                return Err(ControlError::not_found(format!(
                    "object {}/{}",
                    req.bucket, req.key,
                )));
            }
            return Err(ControlError::delete_marker(req.key.clone()));
        }

        let locators = txn.locators_of(object.id);
        let (chosen, strategy) = match locators
            .iter()
            .find(|l| l.location_tag == req.client_from_region)
        {
            Some(locator) => (Some(*locator), "exact match"),
            None => (
                locators.iter().find(|l| l.is_primary).copied(),
                "primary",
            ),
        };
        let Some(chosen) = chosen else {
            return Err(ControlError::configuration(format!(
                "object {}/{} has neither a client-region nor a primary locator",
                req.bucket, req.key,
            )));
        };

        debug!(
            bucket = %req.bucket,
            key = %req.key,
            strategy,
            out_of = locators.len(),
            locator_id = chosen.id,
            "locate_object chose locator",
        );

        Ok(LocateObjectResponse {
            id: chosen.id,
            tag: chosen.location_tag.clone(),
            cloud: chosen.cloud.clone(),
            bucket: chosen.bucket.clone(),
            region: chosen.region.clone(),
            key: chosen.key.clone(),
            size: object.size,
            last_modified: object.last_modified,
            etag: object.etag.clone(),
            multipart_upload_id: None,
            version_id: chosen.version_id.clone(),
            version: exposed_version(versioning, object.id),
        })
    }

    /// Return logical metadata for the latest (or a specific) version.
    pub fn handle_head_object(
        &self,
        req: HeadObjectRequest,
    ) -> Result<HeadObjectResponse, ControlError> {
        let txn = self.store.begin_read();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        let rows = txn.objects_for_key(&req.bucket, &req.key, &[Status::Ready]);
        let object = match req.version_id {
            Some(vid) => rows.into_iter().find(|o| o.id == vid),
            None => rows.into_iter().next(),
        };
        let Some(object) = object else {
            return Err(ControlError::not_found(format!(
                "object {}/{}",
                req.bucket, req.key,
            )));
        };
        if object.delete_marker {
            if req.version_id.is_none() {
                return Err(ControlError::not_found(format!(
                    "object {}/{}",
                    req.bucket, req.key,
                )));
            }
            return Err(ControlError::delete_marker(req.key.clone()));
        }

        Ok(HeadObjectResponse {
            bucket: object.bucket.clone(),
            key: object.key.clone(),
            size: object.size,
            etag: object.etag.clone(),
            last_modified: object.last_modified,
            version_id: exposed_version(versioning, object.id),
        })
    }

    /// Stage pull-through replication of an object into warmup regions.
    pub fn handle_start_warmup(
        &self,
        req: StartWarmupRequest,
    ) -> Result<StartWarmupResponse, ControlError> {
        let mut txn = self.store.begin_immediate();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        let object: Option<LogicalObject> = {
            let rows = txn.objects_for_key(&req.bucket, &req.key, &[Status::Ready]);
            match req.version_id {
                Some(vid) => rows.into_iter().find(|o| o.id == vid).cloned(),
                None => rows.into_iter().next().cloned(),
            }
        };
        let Some(object) = object else {
            return Err(ControlError::not_found(format!(
                "object {}/{}",
                req.bucket, req.key,
            )));
        };

        let primary: Option<PhysicalObjectLocator> = txn
            .locators_of(object.id)
            .into_iter()
            .find(|l| l.is_primary)
            .cloned();
        let Some(primary) = primary else {
            return Err(ControlError::configuration(format!(
                "object {}/{} has no primary locator",
                req.bucket, req.key,
            )));
        };

        let Some(bucket_row) = txn.bucket(&req.bucket).cloned() else {
            return Err(ControlError::not_found(format!("bucket {}", req.bucket)));
        };

        let now = Utc::now();
        let mut dst_locators = Vec::new();
        for tag in req
            .warmup_regions
            .iter()
            .filter(|tag| **tag != primary.location_tag)
        {
            let Some(pbl) = bucket_row.locator_for_tag(tag) else {
                return Err(ControlError::configuration(format!(
                    "no physical bucket locator for warmup region {tag}",
                )));
            };
            let physical_key = format!("{}{}", pbl.prefix, req.key);
            let locator_id = txn.insert_locator(PhysicalObjectLocator {
                id: 0,
                logical_object_id: object.id,
                location_tag: tag.clone(),
                cloud: pbl.cloud.clone(),
                region: pbl.region.clone(),
                bucket: pbl.bucket.clone(),
                key: physical_key.clone(),
                // The destination replicates exactly the primary's bytes.
                version_id: primary.version_id.clone(),
                status: Status::Pending,
                is_primary: false,
                lock_acquired_ts: Some(now),
                multipart_upload_id: None,
            });
            dst_locators.push(LocateObjectResponse {
                id: locator_id,
                tag: tag.clone(),
                cloud: pbl.cloud.clone(),
                bucket: pbl.bucket.clone(),
                region: pbl.region.clone(),
                key: physical_key,
                size: None,
                last_modified: None,
                etag: None,
                multipart_upload_id: None,
                version_id: primary.version_id.clone(),
                version: exposed_version(versioning, object.id),
            });
        }

        debug!(
            bucket = %req.bucket,
            key = %req.key,
            destinations = dst_locators.len(),
            "start_warmup staged locators",
        );
        txn.commit();

        Ok(StartWarmupResponse {
            src_locator: LocateObjectResponse {
                id: primary.id,
                tag: primary.location_tag.clone(),
                cloud: primary.cloud.clone(),
                bucket: primary.bucket.clone(),
                region: primary.region.clone(),
                key: primary.key.clone(),
                size: None,
                last_modified: None,
                etag: None,
                multipart_upload_id: None,
                version_id: primary.version_id.clone(),
                version: exposed_version(versioning, object.id),
            },
            dst_locators,
        })
    }

    /// Report physical locator statuses for a key, one entry per matching
    /// logical object (client-region locator preferred, else primary).
    pub fn handle_locate_object_status(
        &self,
        req: LocateObjectRequest,
    ) -> Result<Vec<ObjectStatusResponse>, ControlError> {
        let txn = self.store.begin_read();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        let all = [Status::Pending, Status::Ready, Status::PendingDeletion];
        let rows: Vec<&LogicalObject> = txn
            .objects_for_key(&req.bucket, &req.key, &all)
            .into_iter()
            .filter(|o| req.version_id.is_none_or(|vid| o.id == vid))
            .collect();
        if rows.is_empty() {
            return Err(ControlError::not_found(format!(
                "object {}/{}",
                req.bucket, req.key,
            )));
        }

        let mut statuses = Vec::new();
        for object in rows {
            let locators = txn.locators_of(object.id);
            let chosen = locators
                .iter()
                .find(|l| l.location_tag == req.client_from_region)
                .or_else(|| locators.iter().find(|l| l.is_primary));
            if let Some(locator) = chosen {
                statuses.push(ObjectStatusResponse {
                    status: locator.status,
                });
            }
        }
        Ok(statuses)
    }
}
