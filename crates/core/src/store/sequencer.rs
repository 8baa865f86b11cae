//! Per-task operation sequencing
//!
//! Operations that target the same task id run one at a time, in the order
//! they asked for the slot. Operations on different ids do not wait.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::task::TaskId;

#[derive(Default)]
pub(crate) struct IdSequencer {
    slots: Mutex<HashMap<TaskId, Arc<Mutex<()>>>>,
}

impl IdSequencer {
    /// Wait for exclusive use of `id`; released when the guard drops
    pub(crate) async fn acquire(&self, id: TaskId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            // Slots only the map still references are idle
            slots.retain(|key, slot| *key == id || Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(id).or_default())
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.slots.lock().await.len()
    }
}
