use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::dates::{from_timestamp, to_timestamp};
use crate::db::models::{ProfileDraft, ProfileSnapshot, ReferenceContact, WorkHistoryEntry};
use crate::db::ProfileStore;
use crate::telemetry::get_meter;

use super::WizardError;

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn clean_upper(value: &Option<String>) -> Option<String> {
    clean(value).map(|s| s.to_uppercase())
}

/// Convert the draft into its storage form.
///
/// Strings are trimmed and blank ones become absent; dates become midnight
/// UTC timestamps. Absent values stay `None` so the store writes `NULL`
/// over whatever was saved before.
pub fn normalize(draft: &ProfileDraft) -> ProfileSnapshot {
    ProfileSnapshot {
        full_name: clean(&draft.full_name),
        cpf: clean(&draft.cpf),
        birth_date: to_timestamp(draft.birth_date),
        phone: clean(&draft.phone),
        email: clean(&draft.email).map(|email| email.to_lowercase()),
        photo_url: clean(&draft.photo_url),
        license_number: clean(&draft.license_number),
        license_category: clean_upper(&draft.license_category),
        license_expiry: to_timestamp(draft.license_expiry),
        license_points: draft.license_points,
        work_mode: draft.work_mode,
        vehicle_plate: clean_upper(&draft.vehicle_plate),
        permit_expiry: to_timestamp(draft.permit_expiry),
        zip_code: clean(&draft.zip_code),
        street: clean(&draft.street),
        street_number: clean(&draft.street_number),
        complement: clean(&draft.complement),
        neighborhood: clean(&draft.neighborhood),
        city: clean(&draft.city),
        state: clean_upper(&draft.state),
        experience_years: draft.experience_years,
        rental_preferences: draft.rental_preferences.clone(),
        qualifications: draft.qualifications.clone(),
        reference_contact: ReferenceContact {
            name: clean(&draft.reference.name),
            phone: clean(&draft.reference.phone),
            relationship: clean(&draft.reference.relationship),
        },
        work_history: draft
            .work_history
            .iter()
            .map(|entry| WorkHistoryEntry {
                employer: entry.employer.trim().to_string(),
                period: entry.period.trim().to_string(),
                reason_for_leaving: clean(&entry.reason_for_leaving),
                has_outstanding_debt: entry.has_outstanding_debt,
            })
            .collect(),
    }
}

/// Rebuild an editable draft from what the store holds.
pub fn restore(snapshot: &ProfileSnapshot) -> ProfileDraft {
    ProfileDraft {
        full_name: snapshot.full_name.clone(),
        cpf: snapshot.cpf.clone(),
        birth_date: from_timestamp(snapshot.birth_date),
        phone: snapshot.phone.clone(),
        email: snapshot.email.clone(),
        photo_url: snapshot.photo_url.clone(),
        license_number: snapshot.license_number.clone(),
        license_category: snapshot.license_category.clone(),
        license_expiry: from_timestamp(snapshot.license_expiry),
        license_points: snapshot.license_points,
        work_mode: snapshot.work_mode,
        vehicle_plate: snapshot.vehicle_plate.clone(),
        permit_expiry: from_timestamp(snapshot.permit_expiry),
        zip_code: snapshot.zip_code.clone(),
        street: snapshot.street.clone(),
        street_number: snapshot.street_number.clone(),
        complement: snapshot.complement.clone(),
        neighborhood: snapshot.neighborhood.clone(),
        city: snapshot.city.clone(),
        state: snapshot.state.clone(),
        experience_years: snapshot.experience_years,
        work_history: snapshot.work_history.clone(),
        rental_preferences: snapshot.rental_preferences.clone(),
        qualifications: snapshot.qualifications.clone(),
        reference: snapshot.reference_contact.clone(),
    }
}

/// Saves drafts regardless of their validity.
#[derive(Clone)]
pub struct PartialPersistence {
    store: Arc<dyn ProfileStore>,
}

impl PartialPersistence {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Failures are returned as retryable; nothing is retried here.
    pub async fn save(&self, user_id: Uuid, draft: &ProfileDraft) -> Result<(), WizardError> {
        let snapshot = normalize(draft);
        let outcome = self.store.save_draft(user_id, &snapshot).await;
        record_outcome("save", outcome.is_ok());

        match outcome {
            Ok(()) => {
                info!(user_id = %user_id, backend = self.store.backend(), "Profile draft saved");
                Ok(())
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Profile draft save failed");
                Err(WizardError::Persistence(err))
            }
        }
    }

    pub async fn submit(
        &self,
        user_id: Uuid,
        draft: &ProfileDraft,
    ) -> Result<OffsetDateTime, WizardError> {
        let snapshot = normalize(draft);
        let outcome = self.store.submit(user_id, &snapshot).await;
        record_outcome("submit", outcome.is_ok());

        outcome.map_err(|err| {
            warn!(user_id = %user_id, error = %err, "Profile submission failed");
            WizardError::Persistence(err)
        })
    }
}

fn record_outcome(operation: &'static str, success: bool) {
    let counter = get_meter("profile-persistence")
        .u64_counter("profile_writes_total")
        .with_description("Profile writes by operation and outcome")
        .build();
    counter.add(
        1,
        &[
            opentelemetry::KeyValue::new("operation", operation),
            opentelemetry::KeyValue::new("success", success),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryProfileStore;
    use crate::wizard::test_support::complete_draft;
    use time::macros::{date, datetime};

    #[test]
    fn normalize_trims_and_drops_blank_strings() {
        let draft = ProfileDraft {
            full_name: Some("  Maria Souza ".to_string()),
            street: Some("   ".to_string()),
            vehicle_plate: Some("abc-1d23".to_string()),
            state: Some("sp".to_string()),
            email: Some("Maria@Example.com".to_string()),
            ..Default::default()
        };
        let snapshot = normalize(&draft);
        assert_eq!(snapshot.full_name.as_deref(), Some("Maria Souza"));
        assert_eq!(snapshot.street, None);
        assert_eq!(snapshot.vehicle_plate.as_deref(), Some("ABC-1D23"));
        assert_eq!(snapshot.state.as_deref(), Some("SP"));
        assert_eq!(snapshot.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn dates_become_timestamps_and_absent_dates_stay_null() {
        let draft = ProfileDraft {
            license_expiry: Some(date!(2031 - 03 - 09)),
            ..Default::default()
        };
        let snapshot = normalize(&draft);
        assert_eq!(snapshot.license_expiry, Some(datetime!(2031-03-09 0:00 UTC)));
        assert_eq!(snapshot.permit_expiry, None);
        assert_eq!(snapshot.birth_date, None);
    }

    #[test]
    fn restore_inverts_normalize_for_clean_drafts() {
        let draft = complete_draft();
        assert_eq!(restore(&normalize(&draft)), draft);
    }

    #[tokio::test]
    async fn clearing_a_date_overwrites_the_stored_value() {
        let store = Arc::new(InMemoryProfileStore::new());
        let persistence = PartialPersistence::new(store.clone());
        let user_id = Uuid::new_v4();

        let mut draft = ProfileDraft {
            permit_expiry: Some(date!(2032 - 12 - 31)),
            ..Default::default()
        };
        persistence.save(user_id, &draft).await.unwrap();
        let stored = store.load(user_id).await.unwrap().unwrap();
        assert!(stored.snapshot.permit_expiry.is_some());

        draft.permit_expiry = None;
        persistence.save(user_id, &draft).await.unwrap();
        let stored = store.load(user_id).await.unwrap().unwrap();
        assert_eq!(stored.snapshot.permit_expiry, None);
    }

    #[tokio::test]
    async fn invalid_drafts_still_save() {
        let store = Arc::new(InMemoryProfileStore::new());
        let persistence = PartialPersistence::new(store.clone());
        let draft = ProfileDraft {
            cpf: Some("123".to_string()),
            ..Default::default()
        };
        assert!(persistence.save(Uuid::new_v4(), &draft).await.is_ok());
    }

    #[tokio::test]
    async fn store_failures_are_retryable() {
        let store = Arc::new(InMemoryProfileStore::new());
        let persistence = PartialPersistence::new(store.clone());
        let user_id = Uuid::new_v4();

        store.set_offline(true);
        let err = persistence
            .save(user_id, &ProfileDraft::default())
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        store.set_offline(false);
        assert!(persistence.save(user_id, &ProfileDraft::default()).await.is_ok());
    }
}
