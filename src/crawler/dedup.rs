//! Concurrency-safe first-observation test (§4.3).
//!
//! The reference `threadSafeHashSet` checks `Exists` outside its mutex and
//! only locks to insert, which is a race: two workers can both observe
//! `Exists == false` for the same key before either inserts, and both
//! report the key as newly discovered. This implementation fuses the check
//! and the insert into one critical section, which is the spec-mandated
//! correction (§4.3, §9).

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct DedupSet {
    seen: Mutex<HashSet<String>>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Returns whether `key` has ever been inserted.
    pub fn exists(&self, key: &str) -> bool {
        self.seen.lock().unwrap().contains(key)
    }

    /// Inserts `key` if absent. Returns `true` exactly once per distinct
    /// key across the lifetime of this set, regardless of concurrent
    /// callers.
    pub fn add(&self, key: impl Into<String>) -> bool {
        self.seen.lock().unwrap().insert(key.into())
    }

    /// Number of distinct keys ever added.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every key ever added.
    pub fn snapshot(&self) -> HashSet<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn add_reports_first_observation_only() {
        let set = DedupSet::new();
        assert!(set.add("a"));
        assert!(!set.add("a"));
        assert!(set.exists("a"));
        assert!(!set.exists("b"));
    }

    #[test]
    fn add_is_idempotent() {
        let set = DedupSet::new();
        assert!(set.add("x"));
        assert!(!set.add("x"));
        assert!(!set.add("x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn concurrent_add_reports_exactly_one_winner() {
        let set = Arc::new(DedupSet::new());
        let mut handles = Vec::new();
        for _ in 0..64 {
            let set = Arc::clone(&set);
            handles.push(std::thread::spawn(move || set.add("contended")));
        }

        let winners: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(winners, 1);
    }
}
