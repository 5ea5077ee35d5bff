//! Prevents re-processing the same upstream message id twice. Calls are
//! serialized by the single dispatch loop (§5), so this is a plain owned
//! struct behind `&mut self` rather than a lock-guarded one — nothing else
//! in the process ever touches it concurrently.

use indexmap::IndexSet;

pub struct DedupTracker {
    seen_ids: IndexSet<String>,
    max_size: usize,
    cleanup_size: usize,
}

impl DedupTracker {
    pub fn new(max_size: usize, cleanup_size: usize) -> Self {
        DedupTracker {
            seen_ids: IndexSet::new(),
            max_size,
            cleanup_size,
        }
    }

    pub fn seen(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// Idempotent. Inserting past `max_size` evicts oldest-inserted entries
    /// first until exactly `cleanup_size` remain.
    pub fn mark(&mut self, id: &str) {
        self.seen_ids.insert(id.to_string());

        if self.seen_ids.len() > self.max_size {
            let to_remove = self.seen_ids.len() - self.cleanup_size;
            for _ in 0..to_remove {
                self.seen_ids.shift_remove_index(0);
            }
        }
    }

    pub fn clear(&mut self) {
        self.seen_ids.clear();
    }
}
