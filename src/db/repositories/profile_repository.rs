use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::ProfileStore;
use crate::db::error::DatabaseError;
use crate::db::models::{ProfileRecord, ProfileSnapshot, ProfileStatus, WorkHistoryEntry};

const SELECT_PROFILE: &str = r#"
    SELECT user_id, status, submitted_at, created_at, updated_at,
           full_name, cpf, birth_date, phone, email, photo_url,
           license_number, license_category, license_expiry, license_points,
           work_mode, vehicle_plate, permit_expiry,
           zip_code, street, street_number, complement, neighborhood, city, state,
           experience_years, rental_preferences, qualifications, reference_contact
    FROM driver_profiles
    WHERE user_id = $1
"#;

// Every draft column is overwritten so that cleared values become NULL.
const UPSERT_PROFILE: &str = r#"
    INSERT INTO driver_profiles (
        user_id, full_name, cpf, birth_date, phone, email, photo_url,
        license_number, license_category, license_expiry, license_points,
        work_mode, vehicle_plate, permit_expiry,
        zip_code, street, street_number, complement, neighborhood, city, state,
        experience_years, rental_preferences, qualifications, reference_contact
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
            $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
    ON CONFLICT (user_id) DO UPDATE SET
        full_name = EXCLUDED.full_name,
        cpf = EXCLUDED.cpf,
        birth_date = EXCLUDED.birth_date,
        phone = EXCLUDED.phone,
        email = EXCLUDED.email,
        photo_url = EXCLUDED.photo_url,
        license_number = EXCLUDED.license_number,
        license_category = EXCLUDED.license_category,
        license_expiry = EXCLUDED.license_expiry,
        license_points = EXCLUDED.license_points,
        work_mode = EXCLUDED.work_mode,
        vehicle_plate = EXCLUDED.vehicle_plate,
        permit_expiry = EXCLUDED.permit_expiry,
        zip_code = EXCLUDED.zip_code,
        street = EXCLUDED.street,
        street_number = EXCLUDED.street_number,
        complement = EXCLUDED.complement,
        neighborhood = EXCLUDED.neighborhood,
        city = EXCLUDED.city,
        state = EXCLUDED.state,
        experience_years = EXCLUDED.experience_years,
        rental_preferences = EXCLUDED.rental_preferences,
        qualifications = EXCLUDED.qualifications,
        reference_contact = EXCLUDED.reference_contact,
        updated_at = NOW()
"#;

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(UPSERT_PROFILE)
            .bind(user_id)
            .bind(&snapshot.full_name)
            .bind(&snapshot.cpf)
            .bind(snapshot.birth_date)
            .bind(&snapshot.phone)
            .bind(&snapshot.email)
            .bind(&snapshot.photo_url)
            .bind(&snapshot.license_number)
            .bind(&snapshot.license_category)
            .bind(snapshot.license_expiry)
            .bind(snapshot.license_points)
            .bind(snapshot.work_mode)
            .bind(&snapshot.vehicle_plate)
            .bind(snapshot.permit_expiry)
            .bind(&snapshot.zip_code)
            .bind(&snapshot.street)
            .bind(&snapshot.street_number)
            .bind(&snapshot.complement)
            .bind(&snapshot.neighborhood)
            .bind(&snapshot.city)
            .bind(&snapshot.state)
            .bind(snapshot.experience_years)
            .bind(Json(&snapshot.rental_preferences))
            .bind(Json(&snapshot.qualifications))
            .bind(Json(&snapshot.reference_contact))
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn replace_work_history(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        entries: &[WorkHistoryEntry],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM work_history_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        for (position, entry) in entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO work_history_entries
                    (id, user_id, position, employer, period, reason_for_leaving, has_outstanding_debt)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(position as i32)
            .bind(&entry.employer)
            .bind(&entry.period)
            .bind(&entry.reason_for_leaving)
            .bind(entry.has_outstanding_debt)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn load(&self, user_id: Uuid) -> Result<Option<ProfileRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, ProfileRecord>(SELECT_PROFILE)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut record) = record else {
            return Ok(None);
        };

        record.snapshot.work_history = sqlx::query_as::<_, WorkHistoryEntry>(
            r#"
            SELECT employer, period, reason_for_leaving, has_outstanding_debt
            FROM work_history_entries
            WHERE user_id = $1
            ORDER BY position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(record))
    }

    async fn save_draft(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::upsert_profile(&mut tx, user_id, snapshot).await?;
        Self::replace_work_history(&mut tx, user_id, &snapshot.work_history).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn submit(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<OffsetDateTime, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::upsert_profile(&mut tx, user_id, snapshot).await?;
        Self::replace_work_history(&mut tx, user_id, &snapshot.work_history).await?;

        let submitted_at = sqlx::query_scalar::<_, OffsetDateTime>(
            r#"
            UPDATE driver_profiles
            SET status = $1, submitted_at = NOW(), updated_at = NOW()
            WHERE user_id = $2
            RETURNING submitted_at
            "#,
        )
        .bind(ProfileStatus::PendingReview)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(submitted_at)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
