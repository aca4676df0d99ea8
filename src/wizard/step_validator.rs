use crate::db::models::ProfileDraft;

use super::schema::{self, FieldError};
use super::steps::{StepId, StepTable};

/// Errors of the fields owned by one step. Unknown steps have no fields and
/// therefore no errors; use [`is_step_valid`] for the gate.
pub fn step_errors(table: &StepTable, step: StepId, draft: &ProfileDraft) -> Vec<FieldError> {
    match table.get(step) {
        Some(definition) => schema::validate_fields(draft, definition.fields),
        None => Vec::new(),
    }
}

pub fn is_step_valid(table: &StepTable, step: StepId, draft: &ProfileDraft) -> bool {
    table.contains(step) && step_errors(table, step, draft).is_empty()
}

/// First step that does not validate, scanning from step 1.
pub fn first_invalid_step(table: &StepTable, draft: &ProfileDraft) -> Option<StepId> {
    (1..=table.total()).find(|step| !is_step_valid(table, *step, draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{LanguageLevel, WorkMode};
    use crate::wizard::schema::ProfileField;
    use crate::wizard::steps::StepDefinition;
    use crate::wizard::test_support::complete_draft;

    #[test]
    fn step_validity_matches_schema_scoped_to_its_fields() {
        let table = StepTable::profile();
        let mut draft = complete_draft();
        draft.email = Some("not-an-email".to_string());
        draft.city = None;

        for step in table.iter() {
            let scoped = schema::validate(&draft)
                .into_iter()
                .filter(|e| step.fields.contains(&e.field))
                .count();
            assert_eq!(is_step_valid(&table, step.id, &draft), scoped == 0);
        }
        assert!(!is_step_valid(&table, 1, &draft));
        assert!(is_step_valid(&table, 2, &draft));
        assert!(!is_step_valid(&table, 3, &draft));
    }

    #[test]
    fn owner_without_plate_fails_step_two_only() {
        let table = StepTable::profile();
        let mut draft = complete_draft();
        draft.vehicle_plate = None;

        draft.work_mode = Some(WorkMode::Rental);
        assert!(is_step_valid(&table, 2, &draft));

        draft.work_mode = Some(WorkMode::Owner);
        assert!(!is_step_valid(&table, 2, &draft));
        let errors = step_errors(&table, 2, &draft);
        assert_eq!(errors[0].field, ProfileField::VehiclePlate);
        assert_eq!(first_invalid_step(&table, &draft), Some(2));
    }

    #[test]
    fn language_course_requires_level_on_step_six() {
        let table = StepTable::profile();
        let mut draft = complete_draft();
        draft.qualifications.language_course = true;
        draft.qualifications.language_level = None;
        assert!(!is_step_valid(&table, 6, &draft));

        draft.qualifications.language_level = Some(LanguageLevel::Intermediate);
        assert!(is_step_valid(&table, 6, &draft));
    }

    #[test]
    fn all_optional_step_is_valid_when_empty() {
        static OPTIONAL_ONLY: &[StepDefinition] = &[StepDefinition {
            id: 1,
            label_key: "extras",
            label: "Extras",
            fields: &[ProfileField::PhotoUrl, ProfileField::Complement],
        }];
        let table = StepTable::new(OPTIONAL_ONLY).unwrap();
        assert!(is_step_valid(&table, 1, &ProfileDraft::default()));
    }

    #[test]
    fn unknown_steps_are_never_valid() {
        let table = StepTable::profile();
        assert!(!is_step_valid(&table, 0, &complete_draft()));
        assert!(!is_step_valid(&table, 7, &complete_draft()));
    }

    #[test]
    fn complete_draft_has_no_invalid_step() {
        assert_eq!(first_invalid_step(&StepTable::profile(), &complete_draft()), None);
    }
}
