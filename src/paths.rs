//! Tracks and extends the set of root-to-entity paths discovered during a
//! traversal.
//!
//! Time/space complexity note (mirroring the complexity call-outs in this
//! codebase's hierarchy-query module): this indexes paths by both head and
//! tail urn at insertion time, giving `O(1)`-average lookup of "paths
//! ending at `parent`" instead of the linear scan a literal reading of
//! `extendPaths` implies. Observable behavior is identical; only lookup
//! cost differs.

use crate::model::{EdgeDirection, Path, Urn};
use rustc_hash::FxHashMap;

/// The monotonically growing set of paths discovered so far, plus indexes
/// for extending them.
#[derive(Debug, Default)]
pub struct PathStore {
    paths: Vec<Path>,
    by_head: FxHashMap<Urn, Vec<usize>>,
    by_tail: FxHashMap<Urn, Vec<usize>>,
}

impl PathStore {
    /// An empty path store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends every existing path ending at `parent` (in the direction of
    /// growth) with `child`, or seeds a fresh two-element path if `parent`
    /// has none yet. Returns exactly the new paths that now reach `child`.
    ///
    /// For [`EdgeDirection::Outgoing`] growth, "ending at `parent`" means
    /// `parent` is the path's head (index 0); `child` is prepended, so the
    /// original root stays at the tail. For [`EdgeDirection::Incoming`]
    /// growth, "ending at `parent`" means `parent` is the path's tail;
    /// `child` is appended, so the root stays at the head.
    pub fn extend_paths(&mut self, parent: &Urn, child: &Urn, direction: EdgeDirection) -> Vec<Path> {
        match direction {
            EdgeDirection::Outgoing => {
                let candidates = self.by_head.get(parent).cloned().unwrap_or_default();
                if candidates.is_empty() {
                    let seed = vec![child.clone(), parent.clone()];
                    self.insert(seed.clone());
                    return vec![seed];
                }
                let mut new_paths = Vec::with_capacity(candidates.len());
                for idx in candidates {
                    let mut extended = self.paths[idx].clone();
                    extended.insert(0, child.clone());
                    self.insert(extended.clone());
                    new_paths.push(extended);
                }
                new_paths
            }
            EdgeDirection::Incoming => {
                let candidates = self.by_tail.get(parent).cloned().unwrap_or_default();
                if candidates.is_empty() {
                    let seed = vec![parent.clone(), child.clone()];
                    self.insert(seed.clone());
                    return vec![seed];
                }
                let mut new_paths = Vec::with_capacity(candidates.len());
                for idx in candidates {
                    let mut extended = self.paths[idx].clone();
                    extended.push(child.clone());
                    self.insert(extended.clone());
                    new_paths.push(extended);
                }
                new_paths
            }
        }
    }

    fn insert(&mut self, path: Path) {
        let idx = self.paths.len();
        if let Some(head) = path.first() {
            self.by_head.entry(head.clone()).or_default().push(idx);
        }
        if let Some(tail) = path.last() {
            self.by_tail.entry(tail.clone()).or_default().push(idx);
        }
        self.paths.push(path);
    }

    /// Total number of paths accumulated so far, across every entity.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether any paths have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn(s: &str) -> Urn {
        Urn::new(s)
    }

    #[test]
    fn outgoing_seed_then_extend() {
        let mut store = PathStore::new();
        let root = urn("urn:li:dataset:root");
        let b = urn("urn:li:dataset:b");
        let c = urn("urn:li:dataset:c");

        let paths_b = store.extend_paths(&root, &b, EdgeDirection::Outgoing);
        assert_eq!(paths_b, vec![vec![b.clone(), root.clone()]]);

        let paths_c = store.extend_paths(&b, &c, EdgeDirection::Outgoing);
        assert_eq!(paths_c, vec![vec![c.clone(), b.clone(), root.clone()]]);
    }

    #[test]
    fn incoming_seed_then_extend() {
        let mut store = PathStore::new();
        let root = urn("urn:li:dataset:root");
        let b = urn("urn:li:dataset:b");
        let c = urn("urn:li:dataset:c");

        let paths_b = store.extend_paths(&root, &b, EdgeDirection::Incoming);
        assert_eq!(paths_b, vec![vec![root.clone(), b.clone()]]);

        let paths_c = store.extend_paths(&b, &c, EdgeDirection::Incoming);
        assert_eq!(paths_c, vec![vec![root.clone(), b.clone(), c.clone()]]);
    }

    #[test]
    fn diamond_convergence_collects_both_paths() {
        let mut store = PathStore::new();
        let a = urn("urn:li:dataset:a");
        let b = urn("urn:li:dataset:b");
        let c = urn("urn:li:dataset:c");
        let d = urn("urn:li:dataset:d");

        store.extend_paths(&a, &b, EdgeDirection::Outgoing);
        store.extend_paths(&a, &c, EdgeDirection::Outgoing);
        let mut from_b = store.extend_paths(&b, &d, EdgeDirection::Outgoing);
        let from_c = store.extend_paths(&c, &d, EdgeDirection::Outgoing);
        from_b.extend(from_c);

        assert_eq!(from_b.len(), 2);
        assert!(from_b.iter().all(|p| p.len() == 3 && p[0] == d && p[2] == a));
        assert_ne!(from_b[0], from_b[1]);
    }
}
