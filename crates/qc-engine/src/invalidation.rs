//! Throttled store cache invalidation.
//!
//! A single pending slot holds the store whose cache is due for eviction. A
//! changed unit from another store flushes the slot and takes its place; more
//! changed units from the pending store do nothing. With units visited in
//! store-contiguous order, every changed store is flushed exactly once.
//!
//! Stores that lost rows outside the pass (the below-threshold purge) are
//! deferred to [`InvalidationTracker::finish`], skipping any the pass already
//! flushed.

use std::collections::BTreeSet;

use qc_core::unit::StoreId;

/// Decides when store caches get invalidated. Performs no I/O itself.
#[derive(Debug, Default)]
pub struct InvalidationTracker {
    pending: Option<StoreId>,
    deferred: BTreeSet<StoreId>,
    flushed: BTreeSet<StoreId>,
}

impl InvalidationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change in `store_id`; returns a store to invalidate now, if any.
    pub fn mark(&mut self, store_id: StoreId) -> Option<StoreId> {
        match self.pending {
            Some(pending) if pending == store_id => None,
            Some(pending) => {
                self.pending = Some(store_id);
                self.flushed.insert(pending);
                Some(pending)
            }
            None => {
                self.pending = Some(store_id);
                None
            }
        }
    }

    /// Queue `store_id` for invalidation at the end of the run.
    pub fn defer(&mut self, store_id: StoreId) {
        self.deferred.insert(store_id);
    }

    /// Drain every store still owed an invalidation.
    ///
    /// The pending slot comes first, then deferred stores not already flushed.
    pub fn finish(&mut self) -> Vec<StoreId> {
        let mut out = Vec::new();
        if let Some(pending) = self.pending.take() {
            self.flushed.insert(pending);
            out.push(pending);
        }
        for store_id in std::mem::take(&mut self.deferred) {
            if self.flushed.insert(store_id) {
                out.push(store_id);
            }
        }
        out
    }

    /// Stores flushed so far.
    #[must_use]
    pub const fn flushed(&self) -> &BTreeSet<StoreId> {
        &self.flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drive(tracker: &mut InvalidationTracker, stores: &[StoreId]) -> Vec<StoreId> {
        let mut out: Vec<StoreId> = stores.iter().filter_map(|s| tracker.mark(*s)).collect();
        out.extend(tracker.finish());
        out
    }

    #[test]
    fn empty_run_invalidates_nothing() {
        let mut tracker = InvalidationTracker::new();
        assert!(tracker.finish().is_empty());
    }

    #[test]
    fn repeated_store_is_invalidated_once() {
        let mut tracker = InvalidationTracker::new();
        assert_eq!(drive(&mut tracker, &[1, 1, 1, 1]), vec![1]);
    }

    #[test]
    fn store_transition_flushes_previous() {
        let mut tracker = InvalidationTracker::new();
        assert_eq!(tracker.mark(1), None);
        assert_eq!(tracker.mark(1), None);
        assert_eq!(tracker.mark(2), Some(1));
        assert_eq!(tracker.mark(3), Some(2));
        assert_eq!(tracker.finish(), vec![3]);
    }

    #[test]
    fn contiguous_stores_each_invalidated_exactly_once() {
        let mut tracker = InvalidationTracker::new();
        let visits = [1, 1, 2, 2, 2, 5, 7, 7];
        assert_eq!(drive(&mut tracker, &visits), vec![1, 2, 5, 7]);
    }

    #[test]
    fn deferred_stores_skip_already_flushed() {
        let mut tracker = InvalidationTracker::new();
        tracker.defer(2);
        tracker.defer(9);
        tracker.defer(1);
        assert_eq!(drive(&mut tracker, &[1, 2]), vec![1, 2, 9]);
        assert_eq!(tracker.flushed().len(), 3);
    }

    #[test]
    fn finish_is_drained() {
        let mut tracker = InvalidationTracker::new();
        tracker.mark(4);
        assert_eq!(tracker.finish(), vec![4]);
        assert!(tracker.finish().is_empty());
    }
}
