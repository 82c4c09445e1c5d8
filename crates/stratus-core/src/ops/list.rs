//! Listing paths.

use std::collections::BTreeMap;

use stratus_model::request::{ListObjectsRequest, ListPartsRequest};
use stratus_model::response::{LogicalPartResponse, MultipartResponse, ObjectResponse};
use stratus_model::{ControlError, Status};

use crate::entities::LogicalObject;
use crate::provider::ControlPlane;

impl ControlPlane {
    /// List the latest live object per key, excluding delete markers.
    pub fn handle_list_objects(
        &self,
        req: ListObjectsRequest,
    ) -> Result<Vec<ObjectResponse>, ControlError> {
        let txn = self.store.begin_read();
        if txn
            .bucket(&req.bucket)
            .is_none_or(|b| b.status != Status::Ready)
        {
            return Err(ControlError::not_found(format!("bucket {}", req.bucket)));
        }

        // Latest ready row per key; a delete marker as the latest hides the
        // key entirely.
        let mut latest: BTreeMap<&str, &LogicalObject> = BTreeMap::new();
        for object in txn.objects_in_bucket(&req.bucket, &[Status::Ready]) {
            latest
                .entry(object.key.as_str())
                .and_modify(|current| {
                    if object.id > current.id {
                        *current = object;
                    }
                })
                .or_insert(object);
        }

        let mut out = Vec::new();
        for object in latest.into_values() {
            if object.delete_marker {
                continue;
            }
            if !matches_listing_filters(object, &req) {
                continue;
            }
            out.push(ObjectResponse {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
                size: object.size,
                etag: object.etag.clone(),
                last_modified: object.last_modified,
                version_id: None,
            });
            if req.max_keys.is_some_and(|max| out.len() >= max) {
                break;
            }
        }
        Ok(out)
    }

    /// List every ready logical object, one row per version.
    pub fn handle_list_objects_versioning(
        &self,
        req: ListObjectsRequest,
    ) -> Result<Vec<ObjectResponse>, ControlError> {
        let txn = self.store.begin_read();
        if txn
            .bucket(&req.bucket)
            .is_none_or(|b| b.status != Status::Ready)
        {
            return Err(ControlError::not_found(format!("bucket {}", req.bucket)));
        }

        let mut rows: Vec<&LogicalObject> = txn
            .objects_in_bucket(&req.bucket, &[Status::Ready])
            .into_iter()
            .filter(|object| matches_listing_filters(object, &req))
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key).then(a.id.cmp(&b.id)));
        if let Some(max) = req.max_keys {
            rows.truncate(max);
        }

        Ok(rows
            .into_iter()
            .map(|object| ObjectResponse {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
                size: object.size,
                etag: object.etag.clone(),
                last_modified: object.last_modified,
                version_id: Some(object.id),
            })
            .collect())
    }

    /// List in-flight multipart uploads under a prefix.
    pub fn handle_list_multipart_uploads(
        &self,
        req: ListObjectsRequest,
    ) -> Result<Vec<MultipartResponse>, ControlError> {
        let txn = self.store.begin_read();
        let prefix = req.prefix.unwrap_or_default();
        let mut uploads: Vec<MultipartResponse> = txn
            .objects_in_bucket(&req.bucket, &[Status::Pending])
            .into_iter()
            .filter(|object| object.key.starts_with(&prefix))
            .filter_map(|object| {
                object.multipart_upload_id.as_ref().map(|upload_id| {
                    MultipartResponse {
                        bucket: object.bucket.clone(),
                        key: object.key.clone(),
                        upload_id: upload_id.clone(),
                    }
                })
            })
            .collect();
        uploads.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(uploads)
    }

    /// List the committed logical parts of one multipart upload.
    pub fn handle_list_parts(
        &self,
        req: ListPartsRequest,
    ) -> Result<Vec<LogicalPartResponse>, ControlError> {
        let txn = self.store.begin_read();
        let object = txn
            .objects_for_key(&req.bucket, &req.key, &[Status::Pending])
            .into_iter()
            .find(|o| o.multipart_upload_id.as_deref() == Some(req.upload_id.as_str()))
            .cloned()
            .ok_or_else(|| {
                ControlError::not_found(format!(
                    "multipart upload {} for {}/{}",
                    req.upload_id, req.bucket, req.key,
                ))
            })?;

        Ok(txn
            .logical_parts(object.id)
            .iter()
            .filter(|part| {
                req.part_number
                    .is_none_or(|wanted| part.part_number == wanted)
            })
            .map(|part| LogicalPartResponse {
                part_number: part.part_number,
                etag: part.etag.clone(),
                size: part.size,
            })
            .collect())
    }
}

/// Apply the shared prefix / start-after filters of listing requests.
fn matches_listing_filters(object: &LogicalObject, req: &ListObjectsRequest) -> bool {
    if let Some(prefix) = &req.prefix {
        if !object.key.starts_with(prefix) {
            return false;
        }
    }
    if let Some(start_after) = &req.start_after {
        if object.key.as_str() <= start_after.as_str() {
            return false;
        }
    }
    true
}
