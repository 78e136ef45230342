//! The set of urns already emitted by a traversal.
//!
//! Concurrent-safe (`parking_lot`-guarded) so it can be shared for
//! point-in-time membership checks during a hop's parallel batch dispatch;
//! its authoritative mutation happens only in the BFS controller's serial
//! per-hop merge (see `engine::bfs`), per the message-passing design this
//! crate adopts for intra-hop concurrency.

use crate::model::Urn;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// A concurrent-safe set of urns already emitted at any prior or current
/// hop.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<FxHashSet<Urn>>,
}

impl VisitedSet {
    /// A fresh set containing only the traversal root.
    pub fn new(root: Urn) -> Self {
        let mut set = FxHashSet::default();
        set.insert(root);
        VisitedSet { inner: Mutex::new(set) }
    }

    /// Whether `urn` has already been emitted.
    pub fn contains(&self, urn: &Urn) -> bool {
        self.inner.lock().contains(urn)
    }

    /// Records `urn` as emitted. Returns `true` if it was newly inserted.
    pub fn insert(&self, urn: Urn) -> bool {
        self.inner.lock().insert(urn)
    }

    /// A point-in-time clone of the current membership, for handing to
    /// concurrently-spawned batch tasks without sharing the live lock.
    pub fn snapshot(&self) -> FxHashSet<Urn> {
        self.inner.lock().clone()
    }

    /// Number of urns recorded so far.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the set is empty (never true once constructed via [`VisitedSet::new`]).
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_visited_from_construction() {
        let root = Urn::new("urn:li:dataset:root");
        let visited = VisitedSet::new(root.clone());
        assert!(visited.contains(&root));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn insert_reports_first_writer() {
        let root = Urn::new("urn:li:dataset:root");
        let visited = VisitedSet::new(root);
        let b = Urn::new("urn:li:dataset:b");
        assert!(visited.insert(b.clone()));
        assert!(!visited.insert(b));
    }
}
