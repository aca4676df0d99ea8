mod memory_repository;
mod profile_repository;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{ProfileRecord, ProfileSnapshot};

pub use memory_repository::InMemoryProfileStore;
pub use profile_repository::PgProfileStore;

/// Durable home of driver profiles.
///
/// Saves are merges: the draft columns and the work history are replaced,
/// while status, creation time and submission time of an existing profile are
/// kept.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, user_id: Uuid) -> Result<Option<ProfileRecord>, DatabaseError>;

    async fn save_draft(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), DatabaseError>;

    /// Save the snapshot and move the profile to `pending_review`.
    /// Returns the server-assigned submission time.
    async fn submit(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<OffsetDateTime, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}
