use crate::db::models::ProfileDraft;

use super::steps::{StepId, StepTable};

/// Display-only completion: the step has at least one non-optional field
/// filled in. Looser than [`is_step_valid`](super::step_validator::is_step_valid),
/// so a half-filled step shows as completed while still blocking `next`.
pub fn step_completed(table: &StepTable, step: StepId, draft: &ProfileDraft) -> bool {
    let Some(definition) = table.get(step) else {
        return false;
    };
    definition
        .fields
        .iter()
        .filter(|field| !field.rule().requirement.is_optional())
        .any(|field| field.is_filled(draft))
}

pub fn completed_steps(table: &StepTable, draft: &ProfileDraft) -> usize {
    table
        .iter()
        .filter(|step| step_completed(table, step.id, draft))
        .count()
}

/// Completed steps over total steps, as a rounded percentage.
pub fn overall_progress_percent(table: &StepTable, draft: &ProfileDraft) -> u8 {
    let total = table.total() as usize;
    let completed = completed_steps(table, draft);
    ((completed * 100 + total / 2) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::step_validator::is_step_valid;
    use crate::wizard::test_support::complete_draft;

    #[test]
    fn empty_draft_is_zero_percent() {
        let table = StepTable::profile();
        let draft = ProfileDraft::default();
        assert_eq!(overall_progress_percent(&table, &draft), 0);
        assert!(table.iter().all(|s| !step_completed(&table, s.id, &draft)));
    }

    #[test]
    fn complete_draft_is_one_hundred_percent() {
        assert_eq!(
            overall_progress_percent(&StepTable::profile(), &complete_draft()),
            100
        );
    }

    #[test]
    fn one_field_marks_a_step_completed_but_not_valid() {
        let table = StepTable::profile();
        let draft = ProfileDraft {
            full_name: Some("Maria Souza".to_string()),
            ..Default::default()
        };
        assert!(step_completed(&table, 1, &draft));
        assert!(!is_step_valid(&table, 1, &draft));
        assert_eq!(overall_progress_percent(&table, &draft), 17);
    }

    #[test]
    fn optional_fields_do_not_count() {
        let table = StepTable::profile();
        let draft = ProfileDraft {
            photo_url: Some("https://cdn.example.com/p.jpg".to_string()),
            complement: Some("Apto 12".to_string()),
            ..Default::default()
        };
        assert_eq!(overall_progress_percent(&table, &draft), 0);
    }

    #[test]
    fn progress_never_decreases_as_steps_fill_up() {
        let table = StepTable::profile();
        let full = complete_draft();
        let mut draft = ProfileDraft::default();
        let mut last = overall_progress_percent(&table, &draft);

        let fill: [fn(&mut ProfileDraft, &ProfileDraft); 6] = [
            |d, f| d.full_name = f.full_name.clone(),
            |d, f| d.work_mode = f.work_mode,
            |d, f| d.city = f.city.clone(),
            |d, f| d.experience_years = f.experience_years,
            |d, f| d.rental_preferences = f.rental_preferences.clone(),
            |d, f| d.reference = f.reference.clone(),
        ];
        let expected = [17, 33, 50, 67, 83, 100];

        for (apply, percent) in fill.iter().zip(expected) {
            apply(&mut draft, &full);
            let now = overall_progress_percent(&table, &draft);
            assert!(now >= last);
            assert_eq!(now, percent);
            last = now;
        }
    }
}
