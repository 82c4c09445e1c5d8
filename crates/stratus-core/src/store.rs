//! In-memory transactional entity store.
//!
//! The store keeps every table of the data model behind one mutex and
//! exposes two transaction shapes:
//!
//! * [`MetaStore::begin_read`]: a consistent snapshot view for selectors;
//!   the shared state cannot change while the handle is alive.
//! * [`MetaStore::begin_immediate`]: the `BEGIN IMMEDIATE` equivalent. The
//!   exclusive lock is acquired *before the first read*, mutations go to a
//!   working copy, and nothing becomes visible until [`WriteTxn::commit`].
//!   Dropping the handle without committing rolls back.
//!
//! Inserted rows are visible to later reads of the same write transaction
//! (read-your-writes), which lets multi-step operations like the delete
//! traversal run in a single transaction.
//!
//! Ids are store-assigned and monotonically increasing; the logical object
//! id doubles as the exposed version id. Counters live inside the database
//! value, so a committed working copy carries its advanced counters with
//! it and ids are never reused.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard};

use crate::entities::{
    LogicalBucket, LogicalObject, MultipartPart, PhysicalObjectLocator, StatisticsRecord,
};
use stratus_model::Status;

/// All entity tables plus the id counters.
#[derive(Debug, Clone, Default)]
pub struct Database {
    buckets: BTreeMap<String, LogicalBucket>,
    objects: BTreeMap<u64, LogicalObject>,
    locators: BTreeMap<u64, PhysicalObjectLocator>,
    logical_parts: BTreeMap<u64, Vec<MultipartPart>>,
    physical_parts: BTreeMap<u64, Vec<MultipartPart>>,
    metrics: Vec<StatisticsRecord>,
    next_object_id: u64,
    next_locator_id: u64,
}

impl Database {
    // -- Buckets --

    /// Fetch a bucket by name.
    #[must_use]
    pub fn bucket(&self, name: &str) -> Option<&LogicalBucket> {
        self.buckets.get(name)
    }

    /// Fetch a bucket mutably by name.
    pub fn bucket_mut(&mut self, name: &str) -> Option<&mut LogicalBucket> {
        self.buckets.get_mut(name)
    }

    /// Insert a bucket row. The caller checks for duplicates first.
    pub fn insert_bucket(&mut self, bucket: LogicalBucket) {
        self.buckets.insert(bucket.bucket.clone(), bucket);
    }

    // -- Logical objects --

    /// Fetch a logical object by id.
    #[must_use]
    pub fn object(&self, id: u64) -> Option<&LogicalObject> {
        self.objects.get(&id)
    }

    /// Fetch a logical object mutably by id.
    pub fn object_mut(&mut self, id: u64) -> Option<&mut LogicalObject> {
        self.objects.get_mut(&id)
    }

    /// All logical objects for `(bucket, key)` whose status is in
    /// `statuses`, ordered newest first (descending id). The first element
    /// is the latest version.
    #[must_use]
    pub fn objects_for_key(
        &self,
        bucket: &str,
        key: &str,
        statuses: &[Status],
    ) -> Vec<&LogicalObject> {
        let mut rows: Vec<&LogicalObject> = self
            .objects
            .values()
            .filter(|obj| {
                obj.bucket == bucket && obj.key == key && statuses.contains(&obj.status)
            })
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows
    }

    /// All logical objects in a bucket whose status is in `statuses`.
    #[must_use]
    pub fn objects_in_bucket(&self, bucket: &str, statuses: &[Status]) -> Vec<&LogicalObject> {
        self.objects
            .values()
            .filter(|obj| obj.bucket == bucket && statuses.contains(&obj.status))
            .collect()
    }

    /// Insert a logical object, assigning its id. Returns the new id.
    pub fn insert_object(&mut self, mut object: LogicalObject) -> u64 {
        self.next_object_id += 1;
        let id = self.next_object_id;
        object.id = id;
        self.objects.insert(id, object);
        id
    }

    /// Remove a logical object row and its logical parts.
    ///
    /// Callers remove the object's physical locators first; a logical
    /// object only leaves the store after its last locator does.
    pub fn remove_object(&mut self, id: u64) {
        self.objects.remove(&id);
        self.logical_parts.remove(&id);
    }

    // -- Physical object locators --

    /// Fetch a physical locator by id.
    #[must_use]
    pub fn locator(&self, id: u64) -> Option<&PhysicalObjectLocator> {
        self.locators.get(&id)
    }

    /// Fetch a physical locator mutably by id.
    pub fn locator_mut(&mut self, id: u64) -> Option<&mut PhysicalObjectLocator> {
        self.locators.get_mut(&id)
    }

    /// Eagerly fetch every physical locator of a logical object, ordered by
    /// locator id.
    #[must_use]
    pub fn locators_of(&self, logical_object_id: u64) -> Vec<&PhysicalObjectLocator> {
        self.locators
            .values()
            .filter(|loc| loc.logical_object_id == logical_object_id)
            .collect()
    }

    /// Insert a physical locator, assigning its id. Returns the new id.
    pub fn insert_locator(&mut self, mut locator: PhysicalObjectLocator) -> u64 {
        self.next_locator_id += 1;
        let id = self.next_locator_id;
        locator.id = id;
        self.locators.insert(id, locator);
        id
    }

    /// Remove a physical locator row and its physical parts.
    pub fn remove_locator(&mut self, id: u64) {
        self.locators.remove(&id);
        self.physical_parts.remove(&id);
    }

    // -- Multipart parts --

    /// The committed logical parts of a logical object.
    #[must_use]
    pub fn logical_parts(&self, object_id: u64) -> &[MultipartPart] {
        self.logical_parts
            .get(&object_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Upsert a logical part; two upserts with the same part number leave
    /// one record carrying the last etag and size.
    pub fn upsert_logical_part(&mut self, object_id: u64, part: MultipartPart) {
        upsert_part(self.logical_parts.entry(object_id).or_default(), part);
    }

    /// The committed physical parts of a locator.
    #[must_use]
    pub fn physical_parts(&self, locator_id: u64) -> &[MultipartPart] {
        self.physical_parts
            .get(&locator_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Upsert a physical part on a locator.
    pub fn upsert_physical_part(&mut self, locator_id: u64, part: MultipartPart) {
        upsert_part(self.physical_parts.entry(locator_id).or_default(), part);
    }

    // -- Metrics --

    /// Append one statistics record.
    pub fn push_metric(&mut self, record: StatisticsRecord) {
        self.metrics.push(record);
    }

    /// All statistics records for a client region, in insertion order.
    #[must_use]
    pub fn metrics_for(&self, client_region: &str) -> Vec<&StatisticsRecord> {
        self.metrics
            .iter()
            .filter(|m| m.client_region == client_region)
            .collect()
    }
}

fn upsert_part(parts: &mut Vec<MultipartPart>, part: MultipartPart) {
    if let Some(existing) = parts
        .iter_mut()
        .find(|p| p.part_number == part.part_number)
    {
        existing.etag = part.etag;
        existing.size = part.size;
    } else {
        parts.push(part);
    }
}

/// The entity store: one [`Database`] behind an exclusive lock.
#[derive(Debug, Default)]
pub struct MetaStore {
    db: Mutex<Database>,
}

impl MetaStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a read transaction: a consistent snapshot of every table.
    pub fn begin_read(&self) -> ReadTxn<'_> {
        ReadTxn {
            guard: self.db.lock(),
        }
    }

    /// Begin a write transaction with an immediate lock.
    ///
    /// The exclusive lock is held from before the first read until the
    /// handle commits or drops, so two writers racing on the latest
    /// version of a key serialize on acquisition order.
    pub fn begin_immediate(&self) -> WriteTxn<'_> {
        let guard = self.db.lock();
        let working = guard.clone();
        WriteTxn {
            slot: guard,
            working,
        }
    }
}

/// A read transaction. Derefs to [`Database`] for selectors.
#[derive(Debug)]
pub struct ReadTxn<'a> {
    guard: MutexGuard<'a, Database>,
}

impl Deref for ReadTxn<'_> {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.guard
    }
}

/// A write transaction over a working copy of the database.
///
/// Mutations are invisible to other transactions until [`WriteTxn::commit`]
/// publishes the working copy; dropping the handle rolls back.
#[derive(Debug)]
pub struct WriteTxn<'a> {
    slot: MutexGuard<'a, Database>,
    working: Database,
}

impl WriteTxn<'_> {
    /// Publish the working copy, making every staged mutation visible
    /// atomically.
    pub fn commit(mut self) {
        *self.slot = std::mem::take(&mut self.working);
    }

    /// Discard every staged mutation. Equivalent to dropping the handle;
    /// spelled out at call sites that roll back deliberately.
    pub fn rollback(self) {
        drop(self);
    }
}

impl Deref for WriteTxn<'_> {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.working
    }
}

impl DerefMut for WriteTxn<'_> {
    fn deref_mut(&mut self) -> &mut Database {
        &mut self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending_object(bucket: &str, key: &str) -> LogicalObject {
        LogicalObject {
            id: 0,
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            size: None,
            last_modified: None,
            etag: None,
            status: Status::Pending,
            multipart_upload_id: None,
            delete_marker: false,
            version_suspended: false,
        }
    }

    fn pending_locator(logical_object_id: u64, tag: &str) -> PhysicalObjectLocator {
        PhysicalObjectLocator {
            id: 0,
            logical_object_id,
            location_tag: tag.to_owned(),
            cloud: "aws".to_owned(),
            region: "us-east-1".to_owned(),
            bucket: "phys".to_owned(),
            key: "k".to_owned(),
            version_id: None,
            status: Status::Pending,
            is_primary: true,
            lock_acquired_ts: Some(Utc::now()),
            multipart_upload_id: None,
        }
    }

    #[test]
    fn test_should_assign_monotonic_object_ids() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let first = txn.insert_object(pending_object("b", "k"));
        let second = txn.insert_object(pending_object("b", "k"));
        assert!(second > first);
        txn.commit();

        let mut txn = store.begin_immediate();
        let third = txn.insert_object(pending_object("b", "k"));
        assert!(third > second);
    }

    #[test]
    fn test_should_discard_mutations_on_rollback() {
        let store = MetaStore::new();
        {
            let mut txn = store.begin_immediate();
            txn.insert_object(pending_object("b", "k"));
            txn.rollback();
        }
        let txn = store.begin_read();
        assert!(txn.objects_for_key("b", "k", &[Status::Pending]).is_empty());
    }

    #[test]
    fn test_should_publish_mutations_on_commit() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let id = txn.insert_object(pending_object("b", "k"));
        txn.insert_locator(pending_locator(id, "aws:us-east-1"));
        txn.commit();

        let txn = store.begin_read();
        let rows = txn.objects_for_key("b", "k", &[Status::Pending]);
        assert_eq!(rows.len(), 1);
        assert_eq!(txn.locators_of(id).len(), 1);
    }

    #[test]
    fn test_should_read_own_writes_inside_write_txn() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let id = txn.insert_object(pending_object("b", "k"));
        assert!(txn.object(id).is_some());
        assert_eq!(txn.objects_for_key("b", "k", &[Status::Pending]).len(), 1);
    }

    #[test]
    fn test_should_order_versions_newest_first() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let v1 = txn.insert_object(pending_object("b", "k"));
        let v2 = txn.insert_object(pending_object("b", "k"));
        let rows = txn.objects_for_key("b", "k", &[Status::Pending]);
        assert_eq!(rows[0].id, v2);
        assert_eq!(rows[1].id, v1);
    }

    #[test]
    fn test_should_upsert_parts_by_part_number() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let id = txn.insert_object(pending_object("b", "k"));
        txn.upsert_logical_part(
            id,
            MultipartPart {
                part_number: 1,
                etag: "a".to_owned(),
                size: 10,
            },
        );
        txn.upsert_logical_part(
            id,
            MultipartPart {
                part_number: 1,
                etag: "b".to_owned(),
                size: 20,
            },
        );
        let parts = txn.logical_parts(id);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].etag, "b");
        assert_eq!(parts[0].size, 20);
    }

    #[test]
    fn test_should_cascade_parts_on_row_removal() {
        let store = MetaStore::new();
        let mut txn = store.begin_immediate();
        let obj = txn.insert_object(pending_object("b", "k"));
        let loc = txn.insert_locator(pending_locator(obj, "aws:us-east-1"));
        txn.upsert_physical_part(
            loc,
            MultipartPart {
                part_number: 1,
                etag: "a".to_owned(),
                size: 10,
            },
        );
        txn.remove_locator(loc);
        assert!(txn.physical_parts(loc).is_empty());
        txn.remove_object(obj);
        assert!(txn.object(obj).is_none());
    }
}
