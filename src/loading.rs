//! Per-namespace loading flags.
//!
//! Kept behind its own lock so that flipping a flag from a background
//! operation never waits on a dispatch in progress.

use parking_lot::Mutex;
use std::collections::HashSet;

/// Set of namespaces currently loading.
#[derive(Debug, Default)]
pub struct LoadingTracker {
    active: Mutex<HashSet<String>>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `namespace` to `loading`. Returns whether the flag flipped.
    ///
    /// The lock is released before returning, so the caller notifies
    /// listeners without holding it.
    pub fn set(&self, namespace: &str, loading: bool) -> bool {
        let flipped = {
            let mut active = self.active.lock();
            if loading {
                active.insert(namespace.to_string())
            } else {
                active.remove(namespace)
            }
        };

        if flipped {
            tracing::trace!(namespace, loading, "loading transition");
        }
        flipped
    }

    pub fn is_loading(&self, namespace: &str) -> bool {
        self.active.lock().contains(namespace)
    }

    /// Namespaces currently loading, sorted.
    pub fn active(&self) -> Vec<String> {
        let mut namespaces: Vec<_> = self.active.lock().iter().cloned().collect();
        namespaces.sort();
        namespaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redundant_transitions_do_not_flip() {
        let tracker = LoadingTracker::new();

        assert!(tracker.set("maps", true));
        assert!(!tracker.set("maps", true));
        assert!(tracker.is_loading("maps"));

        assert!(tracker.set("maps", false));
        assert!(!tracker.set("maps", false));
        assert!(!tracker.is_loading("maps"));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let tracker = LoadingTracker::new();
        assert!(tracker.set("b", true));
        assert!(tracker.set("a", true));
        assert!(!tracker.set("c", false));

        assert_eq!(tracker.active(), vec!["a", "b"]);
        assert!(!tracker.is_loading("c"));
    }
}
