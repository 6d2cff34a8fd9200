//! # Subscriber registry - ordered, lock-protected list of records.
//!
//! ## Architecture
//! ```text
//! WeakEvent.subscribe()    ──► add()                  (write)
//! WeakEvent.unsubscribe()  ──► remove_all_matching()  (write)
//! Dispatcher::publish()    ──► prune_dead()           (read, then write only if needed)
//!                          ──► snapshot()             (read)
//! WeakEvent.subscriber_count() ──► count()            (read)
//! ```
//!
//! ## Rules
//! - Insertion order is publish order.
//! - Guards are never held while a handler runs, so handlers may call back into the registry.
//! - Structural mutations happen under one write guard and appear atomic to readers.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::handlers::Handler;
use crate::handlers::record::HandlerRecord;

/// Ordered collection of subscriber records.
pub(crate) struct SubscriberRegistry<A> {
    records: RwLock<Vec<HandlerRecord<A>>>,
}

impl<A> SubscriberRegistry<A> {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        let records = capacity.map_or_else(Vec::new, Vec::with_capacity);
        Self {
            records: RwLock::new(records),
        }
    }

    // Critical sections never call user code, so a poisoned guard still holds a consistent list.
    fn read(&self) -> RwLockReadGuard<'_, Vec<HandlerRecord<A>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<HandlerRecord<A>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record at the end of the publish order.
    pub(crate) fn add(&self, record: HandlerRecord<A>) {
        self.write().push(record);
    }

    /// Removes every record matching `candidate`; returns how many were removed.
    pub(crate) fn remove_all_matching(&self, candidate: &Handler<A>) -> usize {
        let mut records = self.write();
        let before = records.len();
        records.retain(|record| !record.matches(candidate));
        before - records.len()
    }

    /// Removes records whose owner is gone; returns how many were removed.
    pub(crate) fn prune_dead(&self) -> usize {
        if self.read().iter().all(HandlerRecord::is_alive) {
            return 0;
        }

        let mut records = self.write();
        let before = records.len();
        records.retain(HandlerRecord::is_alive);
        before - records.len()
    }

    /// Independent copy of the live records, in publish order.
    pub(crate) fn snapshot(&self) -> Vec<HandlerRecord<A>> {
        self.read()
            .iter()
            .filter(|record| record.is_alive())
            .cloned()
            .collect()
    }

    /// Number of live records. Advisory: liveness may change right after.
    pub(crate) fn count(&self) -> usize {
        self.read().iter().filter(|record| record.is_alive()).count()
    }

    /// Number of stored records, dead ones included.
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Owner;

    impl Owner {
        fn on_event(&self, _: u32) {}
        fn on_other(&self, _: u32) {}
    }

    fn free(_: u32) {}

    fn record(handler: Handler<u32>) -> HandlerRecord<u32> {
        HandlerRecord::new(handler)
    }

    #[test]
    fn test_remove_all_matching_removes_duplicates() {
        let registry = SubscriberRegistry::new(None);
        let owner = Arc::new(Owner);
        registry.add(record(Handler::method(&owner, Owner::on_event)));
        registry.add(record(Handler::method(&owner, Owner::on_other)));
        registry.add(record(Handler::method(&owner, Owner::on_event)));

        let removed = registry.remove_all_matching(&Handler::method(&owner, Owner::on_event));
        assert_eq!(removed, 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove_all_matching(&Handler::function(free)), 0);
    }

    #[test]
    fn test_prune_dead_keeps_order_of_survivors() {
        let registry = SubscriberRegistry::new(Some(4));
        let kept = Arc::new(Owner);
        let dropped = Arc::new(Owner);
        registry.add(record(Handler::method(&kept, Owner::on_event)));
        registry.add(record(Handler::method(&dropped, Owner::on_event)));
        registry.add(record(Handler::function(free)));
        registry.add(record(Handler::method(&kept, Owner::on_other)));

        drop(dropped);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.count(), 3);

        assert_eq!(registry.prune_dead(), 1);
        assert_eq!(registry.prune_dead(), 0);
        assert_eq!(registry.len(), 3);

        let snapshot = registry.snapshot();
        assert!(snapshot[0].matches(&Handler::method(&kept, Owner::on_event)));
        assert!(snapshot[1].matches(&Handler::function(free)));
        assert!(snapshot[2].matches(&Handler::method(&kept, Owner::on_other)));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_mutation() {
        let registry = SubscriberRegistry::new(None);
        let owner = Arc::new(Owner);
        registry.add(record(Handler::method(&owner, Owner::on_event)));

        let snapshot = registry.snapshot();
        registry.add(record(Handler::function(free)));
        registry.remove_all_matching(&Handler::method(&owner, Owner::on_event));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].matches(&Handler::method(&owner, Owner::on_event)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_skips_dead_records() {
        let registry = SubscriberRegistry::new(None);
        let owner = Arc::new(Owner);
        registry.add(record(Handler::method(&owner, Owner::on_event)));
        drop(owner);

        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.len(), 1);
    }
}
