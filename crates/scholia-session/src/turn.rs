use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

use crate::key::ConversationKey;

type TurnMap = HashMap<ConversationKey, Arc<tokio::sync::Mutex<()>>>;

/// Per-key turn mutexes, present only while a turn holds or waits on them
#[derive(Default)]
pub(crate) struct TurnLocks {
    locks: Arc<Mutex<TurnMap>>,
}

impl TurnLocks {
    pub(crate) async fn acquire(&self, key: &ConversationKey) -> TurnLock {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        TurnLock {
            guard: Some(lock.lock_owned().await),
            key: key.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Exclusive turn on one conversation
///
/// Dropping it releases the turn and forgets the key's mutex once no other
/// turn holds or waits on it.
pub struct TurnLock {
    guard: Option<OwnedMutexGuard<()>>,
    key: ConversationKey,
    locks: Arc<Mutex<TurnMap>>,
}

impl Drop for TurnLock {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Waiters and holders each own a clone; only the map's own is left
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}
