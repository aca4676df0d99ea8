use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use std::fmt;
use time::{Date, OffsetDateTime};
use validator::Validate;

use super::dates::optional_date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "profile_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Incomplete,
    PendingReview,
    Approved,
    Rejected,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Incomplete => "incomplete",
            ProfileStatus::PendingReview => "pending_review",
            ProfileStatus::Approved => "approved",
            ProfileStatus::Rejected => "rejected",
        }
    }

    /// Whether a driver may hand the profile over to moderation.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, ProfileStatus::Incomplete | ProfileStatus::Rejected)
    }

    /// Profiles under review or approved are frozen for the driver.
    pub fn accepts_edits(&self) -> bool {
        self.accepts_submission()
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "work_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    Owner,
    #[serde(alias = "renter")]
    Rental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Sedan,
    Hatchback,
    Suv,
    Minivan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Manual,
    Automatic,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Ethanol,
    Flex,
    Diesel,
    Cng,
    Electric,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageLevel {
    #[serde(alias = "Basic")]
    Basic,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
    #[serde(alias = "Fluent")]
    Fluent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalPreferences {
    pub vehicle_types: Vec<VehicleType>,
    pub transmission: Option<Transmission>,
    pub fuel_types: Vec<FuelType>,
    /// Weekly rate ceiling in whole reais.
    pub max_weekly_rate: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Qualifications {
    pub defensive_driving: bool,
    pub first_aid: bool,
    pub passenger_transport: bool,
    pub language_course: bool,
    pub language_level: Option<LanguageLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

/// A previous employer, edited freely inside the work experience step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct WorkHistoryEntry {
    #[validate(length(min = 1, max = 120, message = "Employer name must not be empty"))]
    pub employer: String,
    #[validate(length(min = 1, max = 60, message = "Period must not be empty"))]
    pub period: String,
    #[validate(length(max = 500))]
    pub reason_for_leaving: Option<String>,
    pub has_outstanding_debt: bool,
}

/// The in-progress profile as edited by the driver. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    #[serde(with = "optional_date")]
    pub birth_date: Option<Date>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,

    pub license_number: Option<String>,
    pub license_category: Option<String>,
    #[serde(with = "optional_date")]
    pub license_expiry: Option<Date>,
    pub license_points: Option<i32>,
    pub work_mode: Option<WorkMode>,
    pub vehicle_plate: Option<String>,
    #[serde(with = "optional_date")]
    pub permit_expiry: Option<Date>,

    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    pub experience_years: Option<i32>,
    pub work_history: Vec<WorkHistoryEntry>,

    pub rental_preferences: RentalPreferences,
    pub qualifications: Qualifications,
    pub reference: ReferenceContact,
}

/// Normalized draft as written to the store. Dates are timestamps.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct ProfileSnapshot {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<OffsetDateTime>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub license_number: Option<String>,
    pub license_category: Option<String>,
    pub license_expiry: Option<OffsetDateTime>,
    pub license_points: Option<i32>,
    pub work_mode: Option<WorkMode>,
    pub vehicle_plate: Option<String>,
    pub permit_expiry: Option<OffsetDateTime>,
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub experience_years: Option<i32>,
    #[sqlx(json)]
    pub rental_preferences: RentalPreferences,
    #[sqlx(json)]
    pub qualifications: Qualifications,
    #[sqlx(json)]
    pub reference_contact: ReferenceContact,
    #[sqlx(skip)]
    pub work_history: Vec<WorkHistoryEntry>,
}

/// A stored profile together with the fields only the backend writes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub status: ProfileStatus,
    pub submitted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub snapshot: ProfileSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn draft_accepts_partial_json_and_loose_dates() {
        let draft: ProfileDraft = serde_json::from_value(serde_json::json!({
            "full_name": "Maria Souza",
            "birth_date": "10/05/1985",
            "license_expiry": "",
            "work_mode": "renter",
            "qualifications": { "language_course": true, "language_level": "Intermediate" }
        }))
        .unwrap();

        assert_eq!(draft.full_name.as_deref(), Some("Maria Souza"));
        assert_eq!(draft.birth_date, Some(date!(1985 - 05 - 10)));
        assert_eq!(draft.license_expiry, None);
        assert_eq!(draft.work_mode, Some(WorkMode::Rental));
        assert_eq!(
            draft.qualifications.language_level,
            Some(LanguageLevel::Intermediate)
        );
        assert!(draft.work_history.is_empty());
    }

    #[test]
    fn draft_rejects_unparseable_dates() {
        let result: Result<ProfileDraft, _> =
            serde_json::from_value(serde_json::json!({ "birth_date": "yesterday" }));
        assert!(result.is_err());
    }

    #[test]
    fn dates_serialize_as_iso() {
        let draft = ProfileDraft {
            permit_expiry: Some(date!(2030 - 01 - 15)),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["permit_expiry"], "2030-01-15");
        assert!(value["birth_date"].is_null());
    }

    #[test]
    fn only_incomplete_or_rejected_profiles_accept_submission() {
        assert!(ProfileStatus::Incomplete.accepts_submission());
        assert!(ProfileStatus::Rejected.accepts_submission());
        assert!(!ProfileStatus::PendingReview.accepts_submission());
        assert!(!ProfileStatus::Approved.accepts_submission());
    }

    #[test]
    fn reviewed_profiles_are_frozen() {
        assert!(ProfileStatus::Rejected.accepts_edits());
        assert!(!ProfileStatus::PendingReview.accepts_edits());
        assert!(!ProfileStatus::Approved.accepts_edits());
    }
}
