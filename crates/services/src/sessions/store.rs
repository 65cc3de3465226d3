use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::{SessionState, UserId};
use tokio::sync::Mutex as AsyncMutex;

pub(crate) type SessionSlot = Arc<AsyncMutex<Option<SessionState>>>;

/// Per-user session slots.
///
/// Each user gets their own async lock, so events for one user are applied
/// one at a time while different users never wait on each other. The outer
/// map lock is only held long enough to look up or insert a slot.
#[derive(Clone, Default)]
pub struct SessionStore {
    slots: Arc<Mutex<HashMap<UserId, SessionSlot>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn slot(&self, user: UserId) -> SessionSlot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(user).or_default())
    }

    /// Drop the slot of a user without a session, unless someone else holds it.
    ///
    /// Callers must have released their own handle to the slot first.
    pub(crate) fn prune(&self, user: UserId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = slots.get(&user).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().is_ok_and(|session| session.is_none())
        });
        if idle {
            slots.remove(&user);
        }
    }

    /// Copy of the user's current session, if any.
    pub async fn snapshot(&self, user: UserId) -> Option<SessionState> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.get(&user).map(Arc::clone)
        }?;
        let guard = slot.lock().await;
        guard.clone()
    }

    /// Number of users with a slot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
