use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::db::ProfileStore;

use super::navigation::ProfileWizard;
use super::persistence::PartialPersistence;
use super::WizardError;

pub type WizardHandle = Arc<Mutex<ProfileWizard>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no profile session for user {0}")]
    NotFound(Uuid),

    #[error("a previous save is still in progress")]
    Busy,
}

/// Wizards of the logged-in drivers.
///
/// A wizard is created on login and dropped on logout. Mutations go through
/// [`acquire`](Self::acquire), which refuses to wait: while one transition is
/// saving, a second one is turned away as [`SessionError::Busy`].
#[derive(Clone)]
pub struct SessionRegistry {
    persistence: PartialPersistence,
    sessions: Arc<RwLock<HashMap<Uuid, WizardHandle>>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            persistence: PartialPersistence::new(store),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open (or reuse) the wizard of a driver.
    pub async fn login(&self, user_id: Uuid) -> Result<WizardHandle, WizardError> {
        if let Some(existing) = self.get(user_id) {
            return Ok(existing);
        }

        let wizard = ProfileWizard::open(user_id, self.persistence.clone()).await?;
        let handle = Arc::new(Mutex::new(wizard));

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let handle = sessions.entry(user_id).or_insert(handle).clone();
        info!(user_id = %user_id, active = sessions.len(), "Profile session opened");
        Ok(handle)
    }

    /// Drop the driver's wizard. A save already in flight still completes.
    pub fn logout(&self, user_id: Uuid) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let removed = sessions.remove(&user_id).is_some();
        if removed {
            info!(user_id = %user_id, active = sessions.len(), "Profile session closed");
        }
        removed
    }

    pub fn get(&self, user_id: Uuid) -> Option<WizardHandle> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(&user_id).cloned()
    }

    /// Exclusive access for a transition, without waiting.
    pub fn acquire(&self, user_id: Uuid) -> Result<OwnedMutexGuard<ProfileWizard>, SessionError> {
        let handle = self.get(user_id).ok_or(SessionError::NotFound(user_id))?;
        handle.try_lock_owned().map_err(|_| SessionError::Busy)
    }

    /// Access for reads; waits for a running transition to finish.
    pub async fn wait(&self, user_id: Uuid) -> Result<OwnedMutexGuard<ProfileWizard>, SessionError> {
        let handle = self.get(user_id).ok_or(SessionError::NotFound(user_id))?;
        Ok(handle.lock_owned().await)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
