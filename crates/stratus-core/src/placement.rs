//! Placement planning.
//!
//! Given a bucket's physical bucket locators and the upload's policy,
//! compute which region tags the client must write to and which single
//! region is the primary write region. Server-side copies additionally
//! narrow the upload set to regions where the copy source actually lives.

use std::collections::BTreeSet;

use stratus_model::{ControlError, PlacementPolicy};

use crate::entities::LogicalBucket;

/// The regions an upload fans out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPlan {
    /// Region tags the client must write to.
    pub upload_to_region_tags: Vec<String>,
    /// The single region whose locator becomes the primary.
    pub primary_write_region: String,
}

/// Compute the upload fan-out for a request.
///
/// `existing_primary_tag` is the location tag of the existing object's
/// primary locator, when one exists; it redirects `CopyOnRead` placement so
/// the new replica points back at the authoritative copy.
pub fn plan_upload(
    policy: PlacementPolicy,
    bucket: &LogicalBucket,
    client_from_region: &str,
    existing_primary_tag: Option<&str>,
) -> Result<PlacementPlan, ControlError> {
    if policy == PlacementPolicy::CopyOnRead {
        if let Some(primary_tag) = existing_primary_tag {
            if primary_tag == client_from_region {
                return Err(ControlError::configuration(format!(
                    "copy_on_read primary region {primary_tag} equals the client region",
                )));
            }
            return Ok(PlacementPlan {
                upload_to_region_tags: vec![client_from_region.to_owned()],
                primary_write_region: primary_tag.to_owned(),
            });
        }
    }

    match policy {
        PlacementPolicy::Push => {
            let upload_to_region_tags: Vec<String> = bucket
                .locators
                .iter()
                .filter(|pbl| pbl.is_primary || pbl.need_warmup)
                .map(|pbl| pbl.location_tag.clone())
                .collect();
            let mut primaries = bucket.locators.iter().filter(|pbl| pbl.is_primary);
            let primary = primaries.next().ok_or_else(|| {
                ControlError::configuration(format!(
                    "bucket {} has no primary physical bucket locator",
                    bucket.bucket,
                ))
            })?;
            if primaries.next().is_some() {
                return Err(ControlError::configuration(format!(
                    "bucket {} has more than one primary physical bucket locator",
                    bucket.bucket,
                )));
            }
            Ok(PlacementPlan {
                upload_to_region_tags,
                primary_write_region: primary.location_tag.clone(),
            })
        }
        // First write wins the primary: write_local, and copy_on_read when
        // no primary exists yet.
        PlacementPolicy::WriteLocal | PlacementPolicy::CopyOnRead => Ok(PlacementPlan {
            upload_to_region_tags: vec![client_from_region.to_owned()],
            primary_write_region: client_from_region.to_owned(),
        }),
    }
}

/// Narrow an upload set to the regions where a copy source lives.
///
/// The intersection preserves the plan's ordering; when it is empty the
/// client has to copy wherever the source is, so the full source region set
/// is returned instead.
#[must_use]
pub fn restrict_to_copy_sources(
    upload_to_region_tags: Vec<String>,
    source_tags: &BTreeSet<String>,
) -> Vec<String> {
    let narrowed: Vec<String> = upload_to_region_tags
        .into_iter()
        .filter(|tag| source_tags.contains(tag))
        .collect();
    if narrowed.is_empty() {
        source_tags.iter().cloned().collect()
    } else {
        narrowed
    }
}
