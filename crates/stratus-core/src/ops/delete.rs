//! Delete state machine.
//!
//! `start_delete_objects` classifies each key into one of three S3
//! behaviors (insert a delete marker, flip the null version in place, or
//! remove rows) and stages the physical work. `complete_delete_objects`
//! commits what the client actually did. The whole staging traversal runs
//! in one immediate transaction: either every key's staging commits or
//! none does.

use chrono::Utc;
use tracing::debug;

use stratus_model::request::{CompleteDeleteObjectsRequest, DeleteObjectsRequest};
use stratus_model::response::{DeleteMarkerInfo, DeleteObjectsResponse, LocateObjectResponse};
use stratus_model::{ControlError, DeleteOpType, Status, VersioningState};

use crate::entities::{LogicalObject, PhysicalObjectLocator};
use crate::policy::delete_disposition;
use crate::provider::ControlPlane;
use crate::store::WriteTxn;

use super::{exposed_version, versioning_of};

impl ControlPlane {
    /// Begin a two-phase delete for a batch of keys.
    #[allow(clippy::too_many_lines)]
    pub fn handle_start_delete_objects(
        &self,
        req: DeleteObjectsRequest,
    ) -> Result<DeleteObjectsResponse, ControlError> {
        let mut txn = self.store.begin_immediate();
        let versioning = versioning_of(&txn, &req.bucket)?;

        let specific_version = req.object_identifiers.values().any(|ids| !ids.is_empty());
        if versioning.is_unset() && specific_version {
            return Err(ControlError::versioning_not_enabled(
                "version ids supplied on a bucket whose versioning was never configured",
            ));
        }
        if let Some(upload_ids) = &req.multipart_upload_ids {
            if upload_ids.len() != req.object_identifiers.len() {
                return Err(ControlError::length_mismatch(
                    "object_identifiers and multipart_upload_ids",
                ));
            }
        }

        let mut response = DeleteObjectsResponse {
            locators: std::collections::BTreeMap::new(),
            delete_markers: std::collections::BTreeMap::new(),
            op_type: std::collections::BTreeMap::new(),
        };

        for (idx, (key, ids)) in req.object_identifiers.iter().enumerate() {
            let upload_id = req
                .multipart_upload_ids
                .as_ref()
                .and_then(|v| v.get(idx))
                .cloned();

            // Latest first. A multipart filter accepts in-flight uploads so
            // aborts can target pending rows.
            let logical_objs: Vec<LogicalObject> = if let Some(upload_id) = &upload_id {
                txn.objects_for_key(&req.bucket, key, &[Status::Ready, Status::Pending])
                    .into_iter()
                    .filter(|o| o.multipart_upload_id.as_deref() == Some(upload_id.as_str()))
                    .cloned()
                    .collect()
            } else {
                txn.objects_for_key(&req.bucket, key, &[Status::Ready])
                    .into_iter()
                    .cloned()
                    .collect()
            };
            if logical_objs.is_empty() {
                return Err(ControlError::not_found(format!(
                    "objects for key {key} in bucket {}",
                    req.bucket,
                )));
            }

            let latest = &logical_objs[0];
            let op = delete_disposition(versioning, latest.version_suspended, !ids.is_empty());
            debug!(key = %key, op = %op, latest_id = latest.id, "classified delete");

            let (locators, marker) = match op {
                DeleteOpType::Add => stage_marker(&mut txn, versioning, latest)?,
                DeleteOpType::Replace => {
                    stage_replace(&mut txn, versioning, latest, upload_id.as_deref())?
                }
                DeleteOpType::Delete => stage_delete(
                    &mut txn,
                    versioning,
                    &logical_objs,
                    ids,
                    upload_id.as_deref(),
                )?,
            };

            response.locators.insert(key.clone(), locators);
            response.delete_markers.insert(key.clone(), marker);
            response.op_type.insert(key.clone(), op);
        }

        txn.commit();
        Ok(response)
    }

    /// Commit staged delete operations.
    pub fn handle_complete_delete_objects(
        &self,
        req: CompleteDeleteObjectsRequest,
    ) -> Result<(), ControlError> {
        if req.ids.len() != req.op_type.len() {
            return Err(ControlError::length_mismatch("ids and op_type"));
        }
        if let Some(upload_ids) = &req.multipart_upload_ids {
            if upload_ids.len() != req.ids.len() {
                return Err(ControlError::length_mismatch("ids and multipart_upload_ids"));
            }
        }

        let mut txn = self.store.begin_immediate();
        for (idx, (&id, op)) in req.ids.iter().zip(req.op_type.iter()).enumerate() {
            let upload_id = req
                .multipart_upload_ids
                .as_ref()
                .and_then(|v| v.get(idx))
                .map(String::as_str);
            match op {
                DeleteOpType::Delete => {
                    let locator = fetch_locator(&txn, id, upload_id)?;
                    if locator.status != Status::PendingDeletion {
                        return Err(ControlError::conflict(format!(
                            "physical locator {id} is not marked for deletion",
                        )));
                    }
                    let logical_object_id = locator.logical_object_id;
                    txn.remove_locator(id);
                    // The logical row follows its last physical locator out.
                    if txn.locators_of(logical_object_id).is_empty() {
                        txn.remove_object(logical_object_id);
                        debug!(logical_object_id, "removed logical object with last locator");
                    }
                }
                DeleteOpType::Replace => {
                    // The flip happened in start_delete_objects.
                }
                DeleteOpType::Add => {
                    let locator = fetch_locator(&txn, id, upload_id)?;
                    if locator.status != Status::Pending {
                        return Err(ControlError::conflict(format!(
                            "physical locator {id} is not marked pending",
                        )));
                    }
                    let logical_object_id = locator.logical_object_id;
                    if let Some(locator) = txn.locator_mut(id) {
                        locator.status = Status::Ready;
                        locator.lock_acquired_ts = None;
                    }
                    // One logical mutation per call: only the first index
                    // promotes the parent delete marker.
                    if idx == 0 {
                        let Some(object) = txn.object_mut(logical_object_id) else {
                            return Err(ControlError::not_found(format!(
                                "logical object {logical_object_id}",
                            )));
                        };
                        object.status = Status::Ready;
                    }
                }
            }
        }
        txn.commit();
        Ok(())
    }
}

/// Fetch a locator by id, honoring an optional multipart-upload filter.
fn fetch_locator(
    txn: &WriteTxn<'_>,
    id: u64,
    upload_id: Option<&str>,
) -> Result<PhysicalObjectLocator, ControlError> {
    txn.locator(id)
        .filter(|l| upload_id.is_none_or(|u| l.multipart_upload_id.as_deref() == Some(u)))
        .cloned()
        .ok_or_else(|| ControlError::not_found(format!("physical locator {id}")))
}

/// Insert a delete marker shadowing `latest`, cloning its locator shape
/// into fresh pending rows. The response reports the new rows but carries
/// the shadowed locators' cloud version ids, since those are what the
/// client's data-plane step operates on.
fn stage_marker(
    txn: &mut WriteTxn<'_>,
    versioning: VersioningState,
    latest: &LogicalObject,
) -> Result<(Vec<LocateObjectResponse>, DeleteMarkerInfo), ControlError> {
    let now = Utc::now();
    let prev_locators: Vec<PhysicalObjectLocator> =
        txn.locators_of(latest.id).into_iter().cloned().collect();

    let marker_id = txn.insert_object(LogicalObject {
        id: 0,
        bucket: latest.bucket.clone(),
        key: latest.key.clone(),
        size: latest.size,
        last_modified: latest.last_modified,
        etag: latest.etag.clone(),
        status: Status::Pending,
        multipart_upload_id: latest.multipart_upload_id.clone(),
        delete_marker: true,
        version_suspended: versioning != VersioningState::Enabled,
    });

    let mut locators = Vec::with_capacity(prev_locators.len());
    for prev in &prev_locators {
        let locator_id = txn.insert_locator(PhysicalObjectLocator {
            id: 0,
            logical_object_id: marker_id,
            location_tag: prev.location_tag.clone(),
            cloud: prev.cloud.clone(),
            region: prev.region.clone(),
            bucket: prev.bucket.clone(),
            key: prev.key.clone(),
            version_id: None,
            status: Status::Pending,
            is_primary: prev.is_primary,
            lock_acquired_ts: Some(now),
            multipart_upload_id: None,
        });
        locators.push(LocateObjectResponse {
            id: locator_id,
            tag: prev.location_tag.clone(),
            cloud: prev.cloud.clone(),
            bucket: prev.bucket.clone(),
            region: prev.region.clone(),
            key: prev.key.clone(),
            size: latest.size,
            last_modified: latest.last_modified,
            etag: latest.etag.clone(),
            multipart_upload_id: None,
            version_id: prev.version_id.clone(),
            version: exposed_version(versioning, marker_id),
        });
    }

    let marker = DeleteMarkerInfo {
        delete_marker: true,
        version_id: (versioning == VersioningState::Enabled).then_some(marker_id),
    };
    Ok((locators, marker))
}

/// Flip the null-version latest object to a delete marker in place.
fn stage_replace(
    txn: &mut WriteTxn<'_>,
    versioning: VersioningState,
    latest: &LogicalObject,
    upload_id: Option<&str>,
) -> Result<(Vec<LocateObjectResponse>, DeleteMarkerInfo), ControlError> {
    if let Some(object) = txn.object_mut(latest.id) {
        object.delete_marker = true;
    }
    let locs: Vec<PhysicalObjectLocator> =
        txn.locators_of(latest.id).into_iter().cloned().collect();
    let mut locators = Vec::with_capacity(locs.len());
    for locator in &locs {
        if locator.status != Status::Ready && upload_id.is_none() {
            return Err(ControlError::conflict(format!(
                "cannot delete physical object in status {}",
                locator.status,
            )));
        }
        locators.push(LocateObjectResponse {
            id: locator.id,
            tag: locator.location_tag.clone(),
            cloud: locator.cloud.clone(),
            bucket: locator.bucket.clone(),
            region: locator.region.clone(),
            key: locator.key.clone(),
            size: latest.size,
            last_modified: latest.last_modified,
            etag: latest.etag.clone(),
            multipart_upload_id: locator.multipart_upload_id.clone(),
            version_id: locator.version_id.clone(),
            version: exposed_version(versioning, latest.id),
        });
    }
    // The replaced object carries the null-version marker, so no version id
    // is exposed.
    let marker = DeleteMarkerInfo {
        delete_marker: true,
        version_id: None,
    };
    Ok((locators, marker))
}

/// Mark the addressed logical objects and all their locators for deletion.
fn stage_delete(
    txn: &mut WriteTxn<'_>,
    versioning: VersioningState,
    logical_objs: &[LogicalObject],
    ids: &[u64],
    upload_id: Option<&str>,
) -> Result<(Vec<LocateObjectResponse>, DeleteMarkerInfo), ControlError> {
    let now = Utc::now();
    let mut locators = Vec::new();
    let mut last_matched: Option<&LogicalObject> = None;

    for object in logical_objs {
        if !ids.is_empty() && !ids.contains(&object.id) {
            continue;
        }
        last_matched = Some(object);
        let locs: Vec<PhysicalObjectLocator> =
            txn.locators_of(object.id).into_iter().cloned().collect();
        for locator in &locs {
            if locator.status != Status::Ready && upload_id.is_none() {
                return Err(ControlError::conflict(format!(
                    "cannot delete physical object in status {}",
                    locator.status,
                )));
            }
            if let Some(row) = txn.locator_mut(locator.id) {
                row.status = Status::PendingDeletion;
                row.lock_acquired_ts = Some(now);
            }
            locators.push(LocateObjectResponse {
                id: locator.id,
                tag: locator.location_tag.clone(),
                cloud: locator.cloud.clone(),
                bucket: locator.bucket.clone(),
                region: locator.region.clone(),
                key: locator.key.clone(),
                size: object.size,
                last_modified: object.last_modified,
                etag: object.etag.clone(),
                multipart_upload_id: locator.multipart_upload_id.clone(),
                version_id: locator.version_id.clone(),
                version: exposed_version(versioning, object.id),
            });
        }
        if let Some(row) = txn.object_mut(object.id) {
            row.status = Status::PendingDeletion;
        }
    }

    // With explicit ids that matched nothing, fall back to the latest row
    // for the summary; its locators list stays empty.
    let summary = last_matched.unwrap_or(&logical_objs[0]);
    let marker = DeleteMarkerInfo {
        delete_marker: summary.delete_marker,
        version_id: (versioning.is_touched() && !summary.version_suspended)
            .then_some(summary.id),
    };
    Ok((locators, marker))
}
