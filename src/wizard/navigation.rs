//! Step navigation.
//!
//! [`WizardPosition`] holds the pure transition rules and never touches the
//! store. [`ProfileWizard`] drives a user's draft through them: it asks the
//! position for the next state, saves the draft, and only then commits the
//! new position.

use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{ProfileDraft, ProfileStatus};

use super::persistence::{restore, PartialPersistence};
use super::progress::{overall_progress_percent, step_completed};
use super::schema;
use super::step_validator::{first_invalid_step, is_step_valid, step_errors};
use super::steps::{StepId, StepTable};
use super::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardPosition {
    current_step: StepId,
    total_steps: StepId,
}

impl WizardPosition {
    pub fn start(table: &StepTable) -> Self {
        Self {
            current_step: 1,
            total_steps: table.total(),
        }
    }

    /// Where a returning driver picks up: the first step that does not
    /// validate, or the last step when every step does.
    pub fn resume(table: &StepTable, draft: &ProfileDraft) -> Self {
        Self {
            current_step: first_invalid_step(table, draft).unwrap_or(table.total()),
            total_steps: table.total(),
        }
    }

    pub fn current_step(self) -> StepId {
        self.current_step
    }

    pub fn total_steps(self) -> StepId {
        self.total_steps
    }

    pub fn is_last(self) -> bool {
        self.current_step == self.total_steps
    }

    /// Advance, gated on the validity of the current step.
    pub fn next(self, table: &StepTable, draft: &ProfileDraft) -> Result<Self, WizardError> {
        let errors = step_errors(table, self.current_step, draft);
        if !errors.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.current_step,
                errors,
            });
        }
        Ok(Self {
            current_step: (self.current_step + 1).min(self.total_steps),
            ..self
        })
    }

    pub fn prev(self) -> Self {
        Self {
            current_step: self.current_step.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Free navigation: any step in range, whatever the current step holds.
    pub fn go_to(self, step: StepId) -> Result<Self, WizardError> {
        if !(1..=self.total_steps).contains(&step) {
            return Err(WizardError::StepOutOfRange(step));
        }
        Ok(Self {
            current_step: step,
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepState {
    pub id: StepId,
    pub label_key: &'static str,
    pub label: String,
    pub completed: bool,
    pub valid: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub user_id: Uuid,
    pub status: ProfileStatus,
    pub current_step: StepId,
    pub total_steps: StepId,
    pub progress_percent: u8,
    pub can_submit: bool,
    pub editable: bool,
    pub steps: Vec<StepState>,
    pub draft: ProfileDraft,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_saved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
}

/// One driver's wizard: the draft being edited and where they are in it.
pub struct ProfileWizard {
    user_id: Uuid,
    table: StepTable,
    draft: ProfileDraft,
    position: WizardPosition,
    status: ProfileStatus,
    submitted_at: Option<OffsetDateTime>,
    last_saved_at: Option<OffsetDateTime>,
    persistence: PartialPersistence,
}

impl ProfileWizard {
    /// Load the driver's profile, creating an empty one on first login.
    pub async fn open(user_id: Uuid, persistence: PartialPersistence) -> Result<Self, WizardError> {
        let table = StepTable::profile();
        let record = persistence.store().load(user_id).await?;

        let wizard = match record {
            Some(record) => {
                let draft = restore(&record.snapshot);
                let position = WizardPosition::resume(&table, &draft);
                info!(
                    user_id = %user_id,
                    step = position.current_step(),
                    status = %record.status,
                    "Resuming profile wizard"
                );
                Self {
                    user_id,
                    table,
                    draft,
                    position,
                    status: record.status,
                    submitted_at: record.submitted_at,
                    last_saved_at: Some(record.updated_at),
                    persistence,
                }
            }
            None => {
                let draft = ProfileDraft::default();
                persistence.save(user_id, &draft).await?;
                info!(user_id = %user_id, "Created empty driver profile");
                Self {
                    user_id,
                    position: WizardPosition::start(&table),
                    table,
                    draft,
                    status: ProfileStatus::Incomplete,
                    submitted_at: None,
                    last_saved_at: Some(OffsetDateTime::now_utc()),
                    persistence,
                }
            }
        };

        Ok(wizard)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn position(&self) -> WizardPosition {
        self.position
    }

    pub fn status(&self) -> ProfileStatus {
        self.status
    }

    pub fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.status.accepts_edits() {
            Ok(())
        } else {
            Err(WizardError::NotEditable(self.status))
        }
    }

    /// Replace the in-memory values. Nothing is saved until the next
    /// transition or an explicit [`save_progress`](Self::save_progress).
    pub fn update_draft(&mut self, draft: ProfileDraft) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.draft = draft;
        Ok(())
    }

    pub async fn save_progress(&mut self) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.persistence.save(self.user_id, &self.draft).await?;
        self.last_saved_at = Some(OffsetDateTime::now_utc());
        Ok(())
    }

    pub async fn next(&mut self) -> Result<StepId, WizardError> {
        let target = match self.position.next(&self.table, &self.draft) {
            Ok(target) => target,
            Err(err) => {
                info!(
                    user_id = %self.user_id,
                    step = self.position.current_step(),
                    "Advance blocked by incomplete fields"
                );
                return Err(err);
            }
        };
        self.move_to(target).await
    }

    pub async fn prev(&mut self) -> Result<StepId, WizardError> {
        let target = self.position.prev();
        self.move_to(target).await
    }

    pub async fn go_to(&mut self, step: StepId) -> Result<StepId, WizardError> {
        let target = self.position.go_to(step)?;
        self.move_to(target).await
    }

    /// Frozen profiles can still be browsed; only editable ones are saved.
    async fn move_to(&mut self, target: WizardPosition) -> Result<StepId, WizardError> {
        if self.status.accepts_edits() {
            self.save_progress().await?;
        }
        info!(
            user_id = %self.user_id,
            from = self.position.current_step(),
            to = target.current_step(),
            "Wizard step changed"
        );
        self.position = target;
        Ok(target.current_step())
    }

    /// Hand the profile to moderation. Every step must validate.
    pub async fn submit(&mut self) -> Result<OffsetDateTime, WizardError> {
        if !self.position.is_last() {
            return Err(WizardError::NotOnLastStep);
        }
        if !self.status.accepts_submission() {
            return Err(WizardError::NotSubmittable(self.status));
        }

        let fields: Vec<_> = self.table.fields().collect();
        let errors = schema::validate_fields(&self.draft, &fields);
        if !errors.is_empty() {
            let first_invalid_step = first_invalid_step(&self.table, &self.draft)
                .unwrap_or(self.position.current_step());
            return Err(WizardError::ProfileIncomplete {
                first_invalid_step,
                errors,
            });
        }

        let submitted_at = self.persistence.submit(self.user_id, &self.draft).await?;
        self.status = ProfileStatus::PendingReview;
        self.submitted_at = Some(submitted_at);
        self.last_saved_at = Some(submitted_at);
        info!(user_id = %self.user_id, "Profile submitted for review");
        Ok(submitted_at)
    }

    pub fn view(&self) -> WizardView {
        let steps = self
            .table
            .iter()
            .map(|step| StepState {
                id: step.id,
                label_key: step.label_key,
                label: step.label.to_string(),
                completed: step_completed(&self.table, step.id, &self.draft),
                valid: is_step_valid(&self.table, step.id, &self.draft),
                current: step.id == self.position.current_step(),
            })
            .collect();

        WizardView {
            user_id: self.user_id,
            status: self.status,
            current_step: self.position.current_step(),
            total_steps: self.position.total_steps(),
            progress_percent: overall_progress_percent(&self.table, &self.draft),
            can_submit: self.position.is_last() && self.status.accepts_submission(),
            editable: self.status.accepts_edits(),
            steps,
            draft: self.draft.clone(),
            last_saved_at: self.last_saved_at,
            submitted_at: self.submitted_at,
        }
    }
}
