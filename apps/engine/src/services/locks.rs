//! Per-pair locks for read-modify-write atomicity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use practice_core::types::PairKey;

/// Lock table with one mutex per (learner, question) pair.
///
/// Answers for the same pair serialize on that pair's mutex; answers for
/// different pairs only touch the table briefly to look their slot up.
/// A slot is dropped from the table once no caller holds or waits on it.
#[derive(Debug, Default)]
pub struct KeyLocks {
    slots: Mutex<HashMap<PairKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<PairKey, Arc<Mutex<()>>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn slot(&self, key: PairKey) -> Arc<Mutex<()>> {
        self.table().entry(key).or_default().clone()
    }

    /// Give back a slot handle, removing the entry if it was the last one.
    ///
    /// Handles are only cloned and dropped under the table lock, so the
    /// strong count cannot change while it is being checked.
    fn release(&self, key: PairKey, slot: Arc<Mutex<()>>) {
        let mut slots = self.table();
        // the table's copy plus ours
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&key);
        }
        drop(slot);
    }

    /// Run `f` while holding the lock for `key`.
    ///
    /// The mutexes guard no data, so a poisoned lock is recovered rather
    /// than propagated.
    pub fn with_lock<T>(&self, key: PairKey, f: impl FnOnce() -> T) -> T {
        let slot = self.slot(key);
        let result = {
            let _guard: MutexGuard<'_, ()> = slot.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };
        self.release(key, slot);
        result
    }

    /// Number of pairs currently locked or waited on.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
