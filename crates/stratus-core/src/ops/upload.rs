//! Upload state machine.
//!
//! `start_upload` runs version policy and placement inside one immediate
//! transaction; the client then writes bytes region by region and reports
//! back through `set_multipart_id` / `append_part` / `complete_upload`.
//! `continue_upload` reads the staged locators back for multipart clients.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::debug;

use stratus_model::request::{
    AppendPartRequest, CompleteUploadRequest, ContinueUploadRequest, SetMultipartIdRequest,
    StartUploadRequest,
};
use stratus_model::response::{
    ContinueUploadPhysicalPart, ContinueUploadResponse, LocateObjectResponse,
    StartUploadResponse,
};
use stratus_model::{ControlError, PlacementPolicy, Status, VersioningState};

use crate::entities::{LogicalObject, MultipartPart, PhysicalObjectLocator};
use crate::placement::{plan_upload, restrict_to_copy_sources};
use crate::policy::{UploadDisposition, upload_disposition};
use crate::provider::ControlPlane;

use super::{exposed_version, new_upload_id, versioning_of};

impl ControlPlane {
    /// Begin a two-phase upload: decide the logical object row, plan the
    /// region fan-out, and stage pending physical locators.
    #[allow(clippy::too_many_lines)]
    pub fn handle_start_upload(
        &self,
        req: StartUploadRequest,
    ) -> Result<StartUploadResponse, ControlError> {
        let mut txn = self.store.begin_immediate();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        let live = [Status::Ready, Status::Pending];
        let existing: Option<LogicalObject> = {
            let rows = txn.objects_for_key(&req.bucket, &req.key, &live);
            match req.version_id {
                Some(vid) => rows.into_iter().find(|o| o.id == vid).cloned(),
                None => rows.into_iter().next().cloned(),
            }
        };

        // Pull-through reads and version-addressed copies need their source
        // to exist.
        if let Some(vid) = req.version_id {
            if existing.is_none()
                && (req.copy_src_bucket.is_none()
                    || req.policy == PlacementPolicy::CopyOnRead)
            {
                return Err(ControlError::not_found(format!("object of version {vid}")));
            }
        }

        let mut existing_tags: BTreeMap<String, u64> = BTreeMap::new();
        let mut existing_primary_tag: Option<String> = None;
        if let Some(existing) = &existing {
            let locators = txn.locators_of(existing.id);
            if versioning.is_unset()
                && locators
                    .iter()
                    .any(|l| l.location_tag == req.client_from_region)
            {
                return Err(ControlError::conflict(format!(
                    "object {}/{} already exists in {}",
                    req.bucket, req.key, req.client_from_region,
                )));
            }
            for locator in locators {
                existing_tags.insert(locator.location_tag.clone(), locator.id);
                if locator.is_primary {
                    existing_primary_tag = Some(locator.location_tag.clone());
                }
            }
        }

        // Resolve the server-side copy source, when present.
        let mut copy_src_map: BTreeMap<String, PhysicalObjectLocator> = BTreeMap::new();
        let mut copy_src_tags: Option<BTreeSet<String>> = None;
        if let (Some(src_bucket), Some(src_key)) =
            (req.copy_src_bucket.as_deref(), req.copy_src_key.as_deref())
        {
            let rows = txn.objects_for_key(src_bucket, src_key, &[Status::Ready]);
            let src = match req.version_id {
                Some(vid) => rows.into_iter().find(|o| o.id == vid),
                None => rows.into_iter().next(),
            };
            let Some(src) = src else {
                return Err(ControlError::not_found(format!(
                    "copy source {src_bucket}/{src_key}",
                )));
            };
            if src.delete_marker {
                if req.version_id.is_none() {
                    return Err(ControlError::not_found(format!(
                        "copy source {src_bucket}/{src_key}",
                    )));
                }
                return Err(ControlError::invalid_request(
                    "not allowed to copy from a delete marker",
                ));
            }
            let src_id = src.id;
            for locator in txn.locators_of(src_id) {
                copy_src_map.insert(locator.location_tag.clone(), locator.clone());
            }
            copy_src_tags = Some(copy_src_map.keys().cloned().collect());
        }

        // Decide the logical object row.
        let disposition = upload_disposition(versioning, existing.as_ref(), req.policy);
        let logical_id = match disposition {
            UploadDisposition::CreateFresh { version_suspended } => {
                txn.insert_object(LogicalObject {
                    id: 0,
                    bucket: req.bucket.clone(),
                    key: req.key.clone(),
                    size: None,
                    last_modified: None,
                    etag: None,
                    status: Status::Pending,
                    multipart_upload_id: req.is_multipart.then(new_upload_id),
                    delete_marker: false,
                    version_suspended,
                })
            }
            UploadDisposition::CloneNew { version_suspended } => {
                let Some(base) = existing.clone() else {
                    return Err(ControlError::configuration(
                        "version policy produced clone-new without an existing object",
                    ));
                };
                // A fresh multipart upload gets its own id; plain overwrites
                // carry the previous one forward. Size and timestamps are
                // placeholders until complete_upload records the outcome.
                let multipart_upload_id = if req.is_multipart {
                    Some(new_upload_id())
                } else {
                    base.multipart_upload_id
                };
                txn.insert_object(LogicalObject {
                    id: 0,
                    bucket: base.bucket,
                    key: base.key,
                    size: base.size,
                    last_modified: base.last_modified,
                    etag: base.etag,
                    status: Status::Pending,
                    multipart_upload_id,
                    delete_marker: false,
                    version_suspended,
                })
            }
            UploadDisposition::Reuse => {
                let Some(existing) = &existing else {
                    return Err(ControlError::configuration(
                        "version policy produced reuse without an existing object",
                    ));
                };
                existing.id
            }
        };

        let Some(bucket_row) = txn.bucket(&req.bucket).cloned() else {
            return Err(ControlError::not_found(format!("bucket {}", req.bucket)));
        };
        let plan = plan_upload(
            req.policy,
            &bucket_row,
            &req.client_from_region,
            existing_primary_tag.as_deref(),
        )?;

        let mut upload_tags = plan.upload_to_region_tags;
        let mut copy_src_buckets = Vec::new();
        let mut copy_src_keys = Vec::new();
        if let Some(src_tags) = &copy_src_tags {
            upload_tags = restrict_to_copy_sources(upload_tags, src_tags);
            for tag in &upload_tags {
                let src = &copy_src_map[tag.as_str()];
                copy_src_buckets.push(src.bucket.clone());
                copy_src_keys.push(src.key.clone());
            }
            debug!(
                ?upload_tags,
                ?copy_src_buckets,
                ?copy_src_keys,
                "narrowed upload set to copy source regions",
            );
        }

        // Stage one pending locator per chosen region. A region that
        // already holds a locator on a reused object is skipped (unset) or
        // reported as-is for in-place overwrites (null-version and
        // pull-through cases).
        let now = Utc::now();
        let mut locators = Vec::new();
        for tag in &upload_tags {
            let already_there = existing_tags.contains_key(tag);
            if already_there && versioning.is_unset() {
                continue;
            }
            let Some(pbl) = bucket_row.locator_for_tag(tag) else {
                return Err(ControlError::configuration(format!(
                    "no physical bucket locator for upload region tag {tag}",
                )));
            };
            let physical_key = format!("{}{}", pbl.prefix, req.key);
            let overwrite_in_place = already_there
                && (req.policy == PlacementPolicy::CopyOnRead
                    || (versioning == VersioningState::Suspended
                        && existing.as_ref().is_some_and(|o| o.version_suspended)));
            let locator_id = if overwrite_in_place {
                existing_tags[tag.as_str()]
            } else {
                txn.insert_locator(PhysicalObjectLocator {
                    id: 0,
                    logical_object_id: logical_id,
                    location_tag: tag.clone(),
                    cloud: pbl.cloud.clone(),
                    region: pbl.region.clone(),
                    bucket: pbl.bucket.clone(),
                    key: physical_key.clone(),
                    version_id: None,
                    status: Status::Pending,
                    is_primary: *tag == plan.primary_write_region,
                    lock_acquired_ts: Some(now),
                    multipart_upload_id: None,
                })
            };
            locators.push(LocateObjectResponse {
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
                version_id: None,
                version: exposed_version(versioning, logical_id),
            });
        }

        let multipart_upload_id = txn
            .object(logical_id)
            .and_then(|o| o.multipart_upload_id.clone());

        debug!(
            bucket = %req.bucket,
            key = %req.key,
            policy = %req.policy,
            logical_id,
            staged = locators.len(),
            "start_upload staged locators",
        );

        txn.commit();
        Ok(StartUploadResponse {
            multipart_upload_id,
            locators,
            copy_src_buckets,
            copy_src_keys,
        })
    }

    /// Commit the outcome of a data-plane write on one locator.
    ///
    /// Idempotent: a repeat call overwrites the same fields and re-promotes
    /// an already-ready row.
    pub fn handle_complete_upload(
        &self,
        req: CompleteUploadRequest,
    ) -> Result<(), ControlError> {
        let mut txn = self.store.begin_immediate();
        let Some(locator) = txn.locator_mut(req.id) else {
            return Err(ControlError::not_found(format!("physical locator {}", req.id)));
        };
        locator.status = Status::Ready;
        locator.lock_acquired_ts = None;
        locator.version_id = req.version_id.clone();
        let is_primary = locator.is_primary;
        let logical_object_id = locator.logical_object_id;

        // The controlling locator promotes the logical object: the single
        // write for write_local / copy_on_read, the primary under push.
        let controls_promotion = match req.policy {
            PlacementPolicy::WriteLocal | PlacementPolicy::CopyOnRead => true,
            PlacementPolicy::Push => is_primary,
        };
        if controls_promotion {
            let Some(object) = txn.object_mut(logical_object_id) else {
                return Err(ControlError::not_found(format!(
                    "logical object {logical_object_id}",
                )));
            };
            object.status = Status::Ready;
            object.size = Some(req.size);
            object.etag = Some(req.etag.clone());
            object.last_modified = Some(req.last_modified);
        }

        debug!(
            locator_id = req.id,
            logical_object_id,
            promoted = controls_promotion,
            "complete_upload committed",
        );
        txn.commit();
        Ok(())
    }

    /// Record the cloud-native multipart upload id on one locator.
    pub fn handle_set_multipart_id(
        &self,
        req: SetMultipartIdRequest,
    ) -> Result<(), ControlError> {
        let mut txn = self.store.begin_immediate();
        let Some(locator) = txn.locator_mut(req.id) else {
            return Err(ControlError::not_found(format!("physical locator {}", req.id)));
        };
        locator.multipart_upload_id = Some(req.multipart_upload_id.clone());
        debug!(
            locator_id = req.id,
            multipart_upload_id = %req.multipart_upload_id,
            "set_multipart_id committed",
        );
        txn.commit();
        Ok(())
    }

    /// Upsert one completed part on a locator; the primary's parts are
    /// mirrored onto the logical object.
    pub fn handle_append_part(&self, req: AppendPartRequest) -> Result<(), ControlError> {
        let mut txn = self.store.begin_immediate();
        let Some(locator) = txn.locator(req.id) else {
            return Err(ControlError::not_found(format!("physical locator {}", req.id)));
        };
        let is_primary = locator.is_primary;
        let logical_object_id = locator.logical_object_id;
        let part = MultipartPart {
            part_number: req.part_number,
            etag: req.etag.clone(),
            size: req.size,
        };
        txn.upsert_physical_part(req.id, part.clone());
        if is_primary {
            txn.upsert_logical_part(logical_object_id, part);
        }
        txn.commit();
        Ok(())
    }

    /// Read back the sibling locators of a pending multipart upload.
    pub fn handle_continue_upload(
        &self,
        req: ContinueUploadRequest,
    ) -> Result<Vec<ContinueUploadResponse>, ControlError> {
        let txn = self.store.begin_read();
        let versioning = versioning_of(&txn, &req.bucket)?;

        if versioning.is_unset() && req.version_id.is_some() {
            return Err(ControlError::versioning_not_enabled(
                "version_id supplied on a bucket whose versioning was never configured",
            ));
        }

        let object = txn
            .objects_for_key(&req.bucket, &req.key, &[Status::Pending])
            .into_iter()
            .find(|o| o.multipart_upload_id.as_deref() == Some(req.multipart_upload_id.as_str()))
            .cloned()
            .ok_or_else(|| {
                ControlError::not_found(format!(
                    "multipart upload {} for {}/{}",
                    req.multipart_upload_id, req.bucket, req.key,
                ))
            })?;
        let locators: Vec<PhysicalObjectLocator> =
            txn.locators_of(object.id).into_iter().cloned().collect();
        if locators.is_empty() {
            return Err(ControlError::not_found(format!(
                "locators of multipart upload {}",
                req.multipart_upload_id,
            )));
        }

        // upload_part_copy: the source must be readable from exactly the
        // regions the upload was fanned out to.
        let mut copy_src_map: Option<BTreeMap<String, PhysicalObjectLocator>> = None;
        if let (Some(src_bucket), Some(src_key)) =
            (req.copy_src_bucket.as_deref(), req.copy_src_key.as_deref())
        {
            let rows = txn.objects_for_key(src_bucket, src_key, &[Status::Ready]);
            let src = match req.version_id {
                Some(vid) => rows.into_iter().find(|o| o.id == vid),
                None => rows.into_iter().next(),
            };
            let Some(src) = src else {
                return Err(ControlError::not_found(format!(
                    "copy source {src_bucket}/{src_key}",
                )));
            };
            let mut map = BTreeMap::new();
            for locator in txn.locators_of(src.id) {
                map.insert(locator.location_tag.clone(), locator.clone());
            }
            if map.is_empty() {
                return Err(ControlError::not_found(format!(
                    "copy source {src_bucket}/{src_key}",
                )));
            }
            let src_tags: BTreeSet<&str> = map.keys().map(String::as_str).collect();
            let dst_tags: BTreeSet<&str> =
                locators.iter().map(|l| l.location_tag.as_str()).collect();
            if src_tags != dst_tags {
                return Err(ControlError::not_found(format!(
                    "source object is not present in the regions the multipart upload \
                     was initiated in (src={src_tags:?} dst={dst_tags:?})",
                )));
            }
            copy_src_map = Some(map);
        }

        let responses = locators
            .iter()
            .map(|locator| ContinueUploadResponse {
                id: locator.id,
                tag: locator.location_tag.clone(),
                cloud: locator.cloud.clone(),
                bucket: locator.bucket.clone(),
                region: locator.region.clone(),
                key: locator.key.clone(),
                multipart_upload_id: locator.multipart_upload_id.clone(),
                version_id: locator.version_id.clone(),
                parts: req.do_list_parts.then(|| {
                    txn.physical_parts(locator.id)
                        .iter()
                        .map(|p| ContinueUploadPhysicalPart {
                            part_number: p.part_number,
                            etag: p.etag.clone(),
                        })
                        .collect()
                }),
                copy_src_bucket: copy_src_map
                    .as_ref()
                    .map(|m| m[locator.location_tag.as_str()].bucket.clone()),
                copy_src_key: copy_src_map
                    .as_ref()
                    .map(|m| m[locator.location_tag.as_str()].key.clone()),
            })
            .collect();
        Ok(responses)
    }
}
