use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use super::ProfileStore;
use crate::db::error::DatabaseError;
use crate::db::models::{ProfileRecord, ProfileSnapshot, ProfileStatus};

/// Process-local store used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, ProfileRecord>>,
    offline: AtomicBool,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away; every call fails until brought back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Overwrite the status, as the moderation workflow would.
    pub fn set_status(&self, user_id: Uuid, status: ProfileStatus) -> bool {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        match profiles.get_mut(&user_id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    fn check_online(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionError(
                "profile store is unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn merge(&self, user_id: Uuid, snapshot: &ProfileSnapshot) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        profiles
            .entry(user_id)
            .and_modify(|record| {
                record.snapshot = snapshot.clone();
                record.updated_at = now;
            })
            .or_insert_with(|| ProfileRecord {
                user_id,
                status: ProfileStatus::Incomplete,
                submitted_at: None,
                created_at: now,
                updated_at: now,
                snapshot: snapshot.clone(),
            });
        now
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: Uuid) -> Result<Option<ProfileRecord>, DatabaseError> {
        self.check_online()?;
        let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
        Ok(profiles.get(&user_id).cloned())
    }

    async fn save_draft(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), DatabaseError> {
        self.check_online()?;
        self.merge(user_id, snapshot);
        Ok(())
    }

    async fn submit(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<OffsetDateTime, DatabaseError> {
        self.check_online()?;
        let now = self.merge(user_id, snapshot);
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = profiles.get_mut(&user_id) {
            record.status = ProfileStatus::PendingReview;
            record.submitted_at = Some(now);
        }
        Ok(now)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check_online()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
