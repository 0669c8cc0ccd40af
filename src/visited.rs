//! Duplicate-state rejection for the depth-first search.
//!
//! Two scopes implement the same [`VisitedStates`] interface:
//! - [`PathScoped`]: the fingerprints on the current search path, popped on
//!   backtrack. Forbids cycles within one path.
//! - [`GloballyScoped`]: the best depth at which each fingerprint was reached
//!   during the current depth bound. Persists across branches and is only
//!   cleared between iterative-deepening rounds.
//!
//! A pair of implementations is itself an implementation that admits a
//! state only if both members do.

use rustc_hash::FxHashMap;

use crate::grid::Fingerprint;

/// A record of explored states consulted before descending into a new one.
pub trait VisitedStates {
    /// Whether a state reached at `depth` is worth exploring.
    fn admits(&self, key: &Fingerprint, depth: usize) -> bool;

    /// Records that the search descends into `key` at `depth`.
    fn enter(&mut self, key: &Fingerprint, depth: usize);

    /// Records that the search backtracked out of `key`.
    fn leave(&mut self, key: &Fingerprint);

    /// Forgets everything.
    fn clear(&mut self);
}

/// Fingerprints of the boards on the current path, root first.
#[derive(Debug, Default)]
pub struct PathScoped {
    path: Vec<Fingerprint>,
}

impl PathScoped {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitedStates for PathScoped {
    fn admits(&self, key: &Fingerprint, _depth: usize) -> bool {
        // paths are at most a few dozen states long
        !self.path.contains(key)
    }

    fn enter(&mut self, key: &Fingerprint, _depth: usize) {
        self.path.push(key.clone());
    }

    fn leave(&mut self, key: &Fingerprint) {
        let popped = self.path.pop();
        debug_assert_eq!(popped.as_ref(), Some(key), "path history out of order");
    }

    fn clear(&mut self) {
        self.path.clear();
    }
}

/// Closed list: the shallowest depth each fingerprint was reached at.
///
/// A state reached again at the same or a greater depth is pruned: it has
/// no more remaining budget than the earlier visit, which already failed.
#[derive(Debug, Default)]
pub struct GloballyScoped {
    best_depth: FxHashMap<Fingerprint, usize>,
}

impl GloballyScoped {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.best_depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_depth.is_empty()
    }
}

impl VisitedStates for GloballyScoped {
    fn admits(&self, key: &Fingerprint, depth: usize) -> bool {
        self.best_depth
            .get(key)
            .map_or(true, |&recorded| depth < recorded)
    }

    fn enter(&mut self, key: &Fingerprint, depth: usize) {
        self.best_depth
            .entry(key.clone())
            .and_modify(|recorded| *recorded = (*recorded).min(depth))
            .or_insert(depth);
    }

    fn leave(&mut self, _key: &Fingerprint) {}

    fn clear(&mut self) {
        self.best_depth.clear();
    }
}

impl<A: VisitedStates, B: VisitedStates> VisitedStates for (A, B) {
    fn admits(&self, key: &Fingerprint, depth: usize) -> bool {
        self.0.admits(key, depth) && self.1.admits(key, depth)
    }

    fn enter(&mut self, key: &Fingerprint, depth: usize) {
        self.0.enter(key, depth);
        self.1.enter(key, depth);
    }

    fn leave(&mut self, key: &Fingerprint) {
        self.0.leave(key);
        self.1.leave(key);
    }

    fn clear(&mut self) {
        self.0.clear();
        self.1.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(values: &[u32]) -> Fingerprint {
        Fingerprint::new(values.to_vec())
    }

    #[test]
    fn test_path_scoped_forgets_on_backtrack() {
        let mut path = PathScoped::new();
        let a = key(&[1]);
        path.enter(&a, 0);
        assert!(!path.admits(&a, 5));
        path.leave(&a);
        assert!(path.admits(&a, 5));
    }

    #[test]
    fn test_globally_scoped_keeps_best_depth() {
        let mut closed = GloballyScoped::new();
        let a = key(&[1, 2]);
        closed.enter(&a, 3);
        closed.leave(&a);

        assert!(!closed.admits(&a, 3), "same depth is dominated");
        assert!(!closed.admits(&a, 4), "deeper is dominated");
        assert!(closed.admits(&a, 2), "shallower revisit must be explored");

        closed.enter(&a, 2);
        assert!(!closed.admits(&a, 2));
        closed.enter(&a, 6);
        assert!(closed.admits(&a, 1), "deeper visit must not overwrite");
        assert!(!closed.admits(&a, 2));
    }

    #[test]
    fn test_globally_scoped_clear_between_rounds() {
        let mut closed = GloballyScoped::new();
        closed.enter(&key(&[7]), 1);
        assert_eq!(closed.len(), 1);
        closed.clear();
        assert!(closed.is_empty());
        assert!(closed.admits(&key(&[7]), 1));
    }

    #[test]
    fn test_pair_requires_both() {
        let mut both = (PathScoped::new(), GloballyScoped::new());
        let a = key(&[3]);
        both.enter(&a, 1);
        both.leave(&a);
        // off the path, but still closed at depth 1
        assert!(both.0.admits(&a, 1));
        assert!(!both.admits(&a, 1));
        assert!(both.admits(&a, 0));
    }
}
