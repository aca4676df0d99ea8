//! Field schema of the driver profile.
//!
//! Every field is a [`ProfileField`] with one static [`FieldRule`]: its
//! requirement and the format check run once the field holds a value.
//! Conditional requirements are evaluated against the whole draft, so a rule
//! such as "plate is required for owners" sees the work mode.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use time::{Date, OffsetDateTime};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::db::models::{ProfileDraft, WorkHistoryEntry, WorkMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FullName,
    Cpf,
    BirthDate,
    Phone,
    Email,
    PhotoUrl,
    LicenseNumber,
    LicenseCategory,
    LicenseExpiry,
    LicensePoints,
    WorkMode,
    VehiclePlate,
    PermitExpiry,
    ZipCode,
    Street,
    StreetNumber,
    Complement,
    Neighborhood,
    City,
    State,
    ExperienceYears,
    WorkHistory,
    VehicleTypes,
    Transmission,
    FuelTypes,
    MaxWeeklyRate,
    LanguageLevel,
    ReferenceName,
    ReferencePhone,
    ReferenceRelationship,
}

impl ProfileField {
    pub const ALL: &'static [ProfileField] = &[
        ProfileField::FullName,
        ProfileField::Cpf,
        ProfileField::BirthDate,
        ProfileField::Phone,
        ProfileField::Email,
        ProfileField::PhotoUrl,
        ProfileField::LicenseNumber,
        ProfileField::LicenseCategory,
        ProfileField::LicenseExpiry,
        ProfileField::LicensePoints,
        ProfileField::WorkMode,
        ProfileField::VehiclePlate,
        ProfileField::PermitExpiry,
        ProfileField::ZipCode,
        ProfileField::Street,
        ProfileField::StreetNumber,
        ProfileField::Complement,
        ProfileField::Neighborhood,
        ProfileField::City,
        ProfileField::State,
        ProfileField::ExperienceYears,
        ProfileField::WorkHistory,
        ProfileField::VehicleTypes,
        ProfileField::Transmission,
        ProfileField::FuelTypes,
        ProfileField::MaxWeeklyRate,
        ProfileField::LanguageLevel,
        ProfileField::ReferenceName,
        ProfileField::ReferencePhone,
        ProfileField::ReferenceRelationship,
    ];

    /// Path of the field in the draft document.
    pub fn name(self) -> &'static str {
        match self {
            ProfileField::FullName => "full_name",
            ProfileField::Cpf => "cpf",
            ProfileField::BirthDate => "birth_date",
            ProfileField::Phone => "phone",
            ProfileField::Email => "email",
            ProfileField::PhotoUrl => "photo_url",
            ProfileField::LicenseNumber => "license_number",
            ProfileField::LicenseCategory => "license_category",
            ProfileField::LicenseExpiry => "license_expiry",
            ProfileField::LicensePoints => "license_points",
            ProfileField::WorkMode => "work_mode",
            ProfileField::VehiclePlate => "vehicle_plate",
            ProfileField::PermitExpiry => "permit_expiry",
            ProfileField::ZipCode => "zip_code",
            ProfileField::Street => "street",
            ProfileField::StreetNumber => "street_number",
            ProfileField::Complement => "complement",
            ProfileField::Neighborhood => "neighborhood",
            ProfileField::City => "city",
            ProfileField::State => "state",
            ProfileField::ExperienceYears => "experience_years",
            ProfileField::WorkHistory => "work_history",
            ProfileField::VehicleTypes => "rental_preferences.vehicle_types",
            ProfileField::Transmission => "rental_preferences.transmission",
            ProfileField::FuelTypes => "rental_preferences.fuel_types",
            ProfileField::MaxWeeklyRate => "rental_preferences.max_weekly_rate",
            ProfileField::LanguageLevel => "qualifications.language_level",
            ProfileField::ReferenceName => "reference.name",
            ProfileField::ReferencePhone => "reference.phone",
            ProfileField::ReferenceRelationship => "reference.relationship",
        }
    }

    /// Whether the driver has put anything in the field.
    pub fn is_filled(self, draft: &ProfileDraft) -> bool {
        match self {
            ProfileField::FullName => text(&draft.full_name).is_some(),
            ProfileField::Cpf => text(&draft.cpf).is_some(),
            ProfileField::BirthDate => draft.birth_date.is_some(),
            ProfileField::Phone => text(&draft.phone).is_some(),
            ProfileField::Email => text(&draft.email).is_some(),
            ProfileField::PhotoUrl => text(&draft.photo_url).is_some(),
            ProfileField::LicenseNumber => text(&draft.license_number).is_some(),
            ProfileField::LicenseCategory => text(&draft.license_category).is_some(),
            ProfileField::LicenseExpiry => draft.license_expiry.is_some(),
            ProfileField::LicensePoints => draft.license_points.is_some(),
            ProfileField::WorkMode => draft.work_mode.is_some(),
            ProfileField::VehiclePlate => text(&draft.vehicle_plate).is_some(),
            ProfileField::PermitExpiry => draft.permit_expiry.is_some(),
            ProfileField::ZipCode => text(&draft.zip_code).is_some(),
            ProfileField::Street => text(&draft.street).is_some(),
            ProfileField::StreetNumber => text(&draft.street_number).is_some(),
            ProfileField::Complement => text(&draft.complement).is_some(),
            ProfileField::Neighborhood => text(&draft.neighborhood).is_some(),
            ProfileField::City => text(&draft.city).is_some(),
            ProfileField::State => text(&draft.state).is_some(),
            ProfileField::ExperienceYears => draft.experience_years.is_some(),
            ProfileField::WorkHistory => !draft.work_history.is_empty(),
            ProfileField::VehicleTypes => !draft.rental_preferences.vehicle_types.is_empty(),
            ProfileField::Transmission => draft.rental_preferences.transmission.is_some(),
            ProfileField::FuelTypes => !draft.rental_preferences.fuel_types.is_empty(),
            ProfileField::MaxWeeklyRate => draft.rental_preferences.max_weekly_rate.is_some(),
            ProfileField::LanguageLevel => draft.qualifications.language_level.is_some(),
            ProfileField::ReferenceName => text(&draft.reference.name).is_some(),
            ProfileField::ReferencePhone => text(&draft.reference.phone).is_some(),
            ProfileField::ReferenceRelationship => text(&draft.reference.relationship).is_some(),
        }
    }

    #[rustfmt::skip]
    pub fn rule(self) -> &'static FieldRule {
        macro_rules! rule {
            ($field:ident, $requirement:expr, $check:expr) => {{
                static RULE: FieldRule = FieldRule {
                    field: ProfileField::$field,
                    requirement: $requirement,
                    check: $check,
                };
                &RULE
            }};
        }

        match self {
            ProfileField::FullName => rule!(FullName, Requirement::Required, check_full_name),
            ProfileField::Cpf => rule!(Cpf, Requirement::Required, check_cpf),
            ProfileField::BirthDate => rule!(BirthDate, Requirement::Required, check_birth_date),
            ProfileField::Phone => rule!(Phone, Requirement::Required, check_phone),
            ProfileField::Email => rule!(Email, Requirement::Required, check_email),
            ProfileField::PhotoUrl => rule!(PhotoUrl, Requirement::Optional, check_photo_url),
            ProfileField::LicenseNumber => rule!(LicenseNumber, Requirement::Required, check_license_number),
            ProfileField::LicenseCategory => rule!(LicenseCategory, Requirement::Required, check_license_category),
            ProfileField::LicenseExpiry => rule!(LicenseExpiry, Requirement::Required, check_license_expiry),
            ProfileField::LicensePoints => rule!(LicensePoints, Requirement::Optional, check_license_points),
            ProfileField::WorkMode => rule!(WorkMode, Requirement::Required, accept_any),
            ProfileField::VehiclePlate => rule!(VehiclePlate, Requirement::RequiredWhen(owner_only), check_vehicle_plate),
            ProfileField::PermitExpiry => rule!(PermitExpiry, Requirement::RequiredWhen(owner_only), check_permit_expiry),
            ProfileField::ZipCode => rule!(ZipCode, Requirement::Required, check_zip_code),
            ProfileField::Street => rule!(Street, Requirement::Required, check_street),
            ProfileField::StreetNumber => rule!(StreetNumber, Requirement::Required, check_street_number),
            ProfileField::Complement => rule!(Complement, Requirement::Optional, check_complement),
            ProfileField::Neighborhood => rule!(Neighborhood, Requirement::Required, check_neighborhood),
            ProfileField::City => rule!(City, Requirement::Required, check_city),
            ProfileField::State => rule!(State, Requirement::Required, check_state),
            ProfileField::ExperienceYears => rule!(ExperienceYears, Requirement::Required, check_experience_years),
            ProfileField::WorkHistory => rule!(WorkHistory, Requirement::Optional, check_work_history),
            ProfileField::VehicleTypes => rule!(VehicleTypes, Requirement::Required, accept_any),
            ProfileField::Transmission => rule!(Transmission, Requirement::Required, accept_any),
            ProfileField::FuelTypes => rule!(FuelTypes, Requirement::Required, accept_any),
            ProfileField::MaxWeeklyRate => rule!(MaxWeeklyRate, Requirement::Optional, check_max_weekly_rate),
            ProfileField::LanguageLevel => rule!(LanguageLevel, Requirement::RequiredWhen(took_language_course), accept_any),
            ProfileField::ReferenceName => rule!(ReferenceName, Requirement::Required, check_reference_name),
            ProfileField::ReferencePhone => rule!(ReferencePhone, Requirement::Required, check_reference_phone),
            ProfileField::ReferenceRelationship => rule!(ReferenceRelationship, Requirement::Optional, check_reference_relationship),
        }
    }
}

impl Serialize for ProfileField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[derive(Clone, Copy)]
pub enum Requirement {
    Required,
    Optional,
    /// Required while the predicate holds, ignored entirely otherwise.
    RequiredWhen(fn(&ProfileDraft) -> bool),
}

impl Requirement {
    pub fn is_optional(self) -> bool {
        matches!(self, Requirement::Optional)
    }
}

pub struct FieldRule {
    pub field: ProfileField,
    pub requirement: Requirement,
    check: fn(&ProfileDraft) -> Result<(), ValidationError>,
}

impl FieldRule {
    pub fn evaluate(&self, draft: &ProfileDraft) -> Result<(), FieldError> {
        let required = match self.requirement {
            Requirement::Required => true,
            Requirement::Optional => false,
            Requirement::RequiredWhen(applies) => {
                if !applies(draft) {
                    return Ok(());
                }
                true
            }
        };

        if !self.field.is_filled(draft) {
            if required {
                return Err(FieldError::new(
                    self.field,
                    invalid("required", "This field is required"),
                ));
            }
            return Ok(());
        }

        (self.check)(draft).map_err(|error| FieldError::new(self.field, error))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: ProfileField,
    #[serde(flatten)]
    pub error: ValidationError,
}

impl FieldError {
    pub fn new(field: ProfileField, error: ValidationError) -> Self {
        Self { field, error }
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }
}

/// Run every rule against the draft.
pub fn validate(draft: &ProfileDraft) -> Vec<FieldError> {
    validate_fields(draft, ProfileField::ALL)
}

/// Run only the rules of the given fields.
pub fn validate_fields(draft: &ProfileDraft, fields: &[ProfileField]) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| field.rule().evaluate(draft).err())
        .collect()
}

fn owner_only(draft: &ProfileDraft) -> bool {
    draft.work_mode == Some(WorkMode::Owner)
}

fn took_language_course(draft: &ProfileDraft) -> bool {
    draft.qualifications.language_course
}


const LICENSE_CATEGORIES: &[&str] = &["A", "B", "C", "D", "E", "AB", "AC", "AD", "AE"];

const STATES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
    "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

const MINIMUM_AGE: i32 = 18;

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let count = value.chars().count();
    if count < min || count > max {
        let mut error = invalid("length", "Value has an invalid length");
        error.add_param(Cow::Borrowed("min"), &min);
        error.add_param(Cow::Borrowed("max"), &max);
        return Err(error);
    }
    Ok(())
}

fn range(value: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = invalid("range", "Value is out of range");
        error.add_param(Cow::Borrowed("min"), &min);
        error.add_param(Cow::Borrowed("max"), &max);
        return Err(error);
    }
    Ok(())
}

fn not_expired(date: Option<Date>) -> Result<(), ValidationError> {
    match date {
        Some(date) if date < today() => Err(invalid("expired", "Document has expired")),
        _ => Ok(()),
    }
}

fn required_text(value: &Option<String>) -> &str {
    text(value).unwrap_or_default()
}

fn accept_any(_: &ProfileDraft) -> Result<(), ValidationError> {
    Ok(())
}

fn check_full_name(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.full_name), 3, 120)
}

/// CPF with valid check digits; repeated-digit sequences are rejected.
pub fn is_valid_cpf(raw: &str) -> bool {
    if raw.chars().any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | ' '))) {
        return false;
    }
    let numbers: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if numbers.len() != 11 || numbers.iter().all(|d| *d == numbers[0]) {
        return false;
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = numbers[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 { 0 } else { rest }
    };

    check_digit(9) == numbers[9] && check_digit(10) == numbers[10]
}

fn check_cpf(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if is_valid_cpf(required_text(&draft.cpf)) {
        Ok(())
    } else {
        Err(invalid("cpf", "CPF is not valid"))
    }
}

fn check_birth_date(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let Some(birth) = draft.birth_date else {
        return Ok(());
    };
    let today = today();
    if birth > today {
        return Err(invalid("range", "Birth date is in the future"));
    }

    let had_birthday = (u8::from(today.month()), today.day()) >= (u8::from(birth.month()), birth.day());
    let age = today.year() - birth.year() - if had_birthday { 0 } else { 1 };
    if age < MINIMUM_AGE {
        let mut error = invalid("minimum_age", "Driver must be at least 18 years old");
        error.add_param(Cow::Borrowed("min"), &MINIMUM_AGE);
        return Err(error);
    }
    Ok(())
}

pub fn is_valid_phone(raw: &str) -> bool {
    if raw.chars().any(|c| !(c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | ' ' | '+'))) {
        return false;
    }
    matches!(digits(raw).len(), 10 | 11)
}

fn check_phone(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if is_valid_phone(required_text(&draft.phone)) {
        Ok(())
    } else {
        Err(invalid("phone", "Phone must have 10 or 11 digits"))
    }
}

fn check_email(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if required_text(&draft.email).validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "E-mail is not valid"))
    }
}

fn check_photo_url(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let url = required_text(&draft.photo_url);
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(invalid("url", "Photo must be a public URL"))
    }
}

fn check_license_number(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let number = required_text(&draft.license_number);
    if number.len() == 11 && number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("license_number", "License number must have 11 digits"))
    }
}

fn check_license_category(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let category = required_text(&draft.license_category).to_ascii_uppercase();
    if LICENSE_CATEGORIES.contains(&category.as_str()) {
        Ok(())
    } else {
        Err(invalid("license_category", "Unknown license category"))
    }
}

fn check_license_expiry(draft: &ProfileDraft) -> Result<(), ValidationError> {
    not_expired(draft.license_expiry)
}

fn check_license_points(draft: &ProfileDraft) -> Result<(), ValidationError> {
    draft
        .license_points
        .map_or(Ok(()), |points| range(points, 0, 40))
}

/// Old (`ABC1234`) and Mercosul (`ABC1D23`) plates, hyphen optional.
pub fn is_valid_plate(raw: &str) -> bool {
    let plate: Vec<char> = raw
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    plate.len() == 7
        && plate[..3].iter().all(char::is_ascii_uppercase)
        && plate[3].is_ascii_digit()
        && (plate[4].is_ascii_digit() || plate[4].is_ascii_uppercase())
        && plate[5..].iter().all(char::is_ascii_digit)
}

fn check_vehicle_plate(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if is_valid_plate(required_text(&draft.vehicle_plate)) {
        Ok(())
    } else {
        Err(invalid("plate", "Vehicle plate is not valid"))
    }
}

fn check_permit_expiry(draft: &ProfileDraft) -> Result<(), ValidationError> {
    not_expired(draft.permit_expiry)
}

fn check_zip_code(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let zip = required_text(&draft.zip_code);
    let well_formed = zip.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '.');
    if well_formed && digits(zip).len() == 8 {
        Ok(())
    } else {
        Err(invalid("zip_code", "CEP must have 8 digits"))
    }
}

fn check_street(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.street), 2, 200)
}

fn check_street_number(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.street_number), 1, 20)
}

fn check_complement(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.complement), 1, 100)
}

fn check_neighborhood(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.neighborhood), 2, 100)
}

fn check_city(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.city), 2, 100)
}

fn check_state(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let state = required_text(&draft.state).to_ascii_uppercase();
    if STATES.contains(&state.as_str()) {
        Ok(())
    } else {
        Err(invalid("state", "Unknown state"))
    }
}

fn check_experience_years(draft: &ProfileDraft) -> Result<(), ValidationError> {
    draft
        .experience_years
        .map_or(Ok(()), |years| range(years, 0, 60))
}

/// Entries are checked in the trimmed form they are stored in.
fn check_work_history(draft: &ProfileDraft) -> Result<(), ValidationError> {
    for (index, entry) in draft.work_history.iter().enumerate() {
        let stored = WorkHistoryEntry {
            employer: entry.employer.trim().to_string(),
            period: entry.period.trim().to_string(),
            ..entry.clone()
        };
        if stored.validate().is_err() {
            let mut error = invalid("invalid_entry", "Work history entry is incomplete");
            error.add_param(Cow::Borrowed("index"), &index);
            return Err(error);
        }
    }
    Ok(())
}

fn check_max_weekly_rate(draft: &ProfileDraft) -> Result<(), ValidationError> {
    draft
        .rental_preferences
        .max_weekly_rate
        .map_or(Ok(()), |rate| range(rate, 1, 100_000))
}

fn check_reference_name(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.reference.name), 3, 120)
}

fn check_reference_phone(draft: &ProfileDraft) -> Result<(), ValidationError> {
    if is_valid_phone(required_text(&draft.reference.phone)) {
        Ok(())
    } else {
        Err(invalid("phone", "Phone must have 10 or 11 digits"))
    }
}

fn check_reference_relationship(draft: &ProfileDraft) -> Result<(), ValidationError> {
    length(required_text(&draft.reference.relationship), 2, 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::test_support::complete_draft;

    #[test]
    fn every_rule_is_attributed_to_its_field() {
        for field in ProfileField::ALL {
            assert_eq!(field.rule().field, *field, "{}", field.name());
        }
    }

    #[test]
    fn complete_draft_has_no_errors() {
        assert_eq!(validate(&complete_draft()), vec![]);
    }

    #[test]
    fn empty_draft_reports_only_required_fields() {
        let errors = validate(&ProfileDraft::default());
        assert!(errors.iter().all(|e| e.code() == "required"));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&ProfileField::FullName));
        assert!(!fields.contains(&ProfileField::PhotoUrl));
        assert!(!fields.contains(&ProfileField::VehiclePlate));
        assert!(!fields.contains(&ProfileField::LanguageLevel));
    }

    #[test]
    fn owner_fields_are_conditional_on_work_mode() {
        let mut draft = complete_draft();
        draft.work_mode = Some(WorkMode::Rental);
        draft.vehicle_plate = None;
        draft.permit_expiry = None;
        assert!(validate(&draft).is_empty());

        draft.work_mode = Some(WorkMode::Owner);
        let fields: Vec<_> = validate(&draft).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![ProfileField::VehiclePlate, ProfileField::PermitExpiry]);
    }

    #[test]
    fn renter_plate_is_not_format_checked() {
        let mut draft = complete_draft();
        draft.work_mode = Some(WorkMode::Rental);
        draft.vehicle_plate = Some("not a plate".to_string());
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn language_level_follows_language_course_flag() {
        let mut draft = complete_draft();
        draft.qualifications.language_course = true;
        draft.qualifications.language_level = None;
        let errors = validate_fields(&draft, &[ProfileField::LanguageLevel]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "required");
    }

    #[test]
    fn cpf_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("5299822472"));
        assert!(!is_valid_cpf("529a982247-25"));
    }

    #[test]
    fn plate_formats() {
        assert!(is_valid_plate("ABC-1234"));
        assert!(is_valid_plate("abc1d23"));
        assert!(!is_valid_plate("AB1-1234"));
        assert!(!is_valid_plate("ABC12345"));
    }

    #[test]
    fn phone_formats() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("1133224455"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("11 9876x4321"));
    }

    #[test]
    fn expired_license_is_reported() {
        let mut draft = complete_draft();
        draft.license_expiry = Some(time::macros::date!(2001 - 01 - 01));
        let errors = validate(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, ProfileField::LicenseExpiry);
        assert_eq!(errors[0].code(), "expired");
    }

    #[test]
    fn underage_driver_is_rejected() {
        let mut draft = complete_draft();
        draft.birth_date = Some(today());
        let errors = validate_fields(&draft, &[ProfileField::BirthDate]);
        assert_eq!(errors[0].code(), "minimum_age");
    }

    #[test]
    fn incomplete_work_history_entry_points_at_its_index() {
        let mut draft = complete_draft();
        draft.work_history.push(WorkHistoryEntry {
            employer: "Rádio Táxi Central".to_string(),
            period: String::new(),
            ..Default::default()
        });
        let errors = validate_fields(&draft, &[ProfileField::WorkHistory]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "invalid_entry");
        assert_eq!(errors[0].error.params["index"], serde_json::json!(1));
    }

    #[test]
    fn blank_work_history_entry_is_invalid_once_trimmed() {
        let mut draft = complete_draft();
        draft.work_history = vec![WorkHistoryEntry {
            employer: "   ".to_string(),
            period: "  ".to_string(),
            ..Default::default()
        }];
        let errors = validate_fields(&draft, &[ProfileField::WorkHistory]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "invalid_entry");
        assert_eq!(errors[0].error.params["index"], serde_json::json!(0));
    }

    #[test]
    fn field_errors_serialize_with_their_path() {
        let error = FieldError::new(ProfileField::VehicleTypes, invalid("required", "x"));
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["field"], "rental_preferences.vehicle_types");
        assert_eq!(value["code"], "required");
    }
}
