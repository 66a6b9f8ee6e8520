//! Per-identifier async locks
//!
//! Serialises verification of one identifier within an engine. Entries are
//! removed once no caller holds or waits for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct IdLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl IdLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds the lock for `id`
    pub(crate) async fn acquire(&self, id: Uuid) -> IdGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(map.entry(id).or_default())
        };
        let guard = lock.lock_owned().await;

        IdGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Number of identifiers currently locked or awaited
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

pub(crate) struct IdGuard<'a> {
    locks: &'a IdLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        // Release the async lock before inspecting the map so our own Arc
        // is no longer counted.
        drop(self.guard.take());

        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(entry) = map.get(&self.id) {
            if Arc::strong_count(entry) == 1 {
                map.remove(&self.id);
            }
        }
    }
}
