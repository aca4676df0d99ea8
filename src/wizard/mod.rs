//! Multi-step driver profile completion.

pub mod navigation;
pub mod persistence;
pub mod progress;
pub mod schema;
pub mod session;
pub mod step_validator;
pub mod steps;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

use crate::db::models::ProfileStatus;
use crate::db::DatabaseError;

pub use navigation::{ProfileWizard, StepState, WizardPosition, WizardView};
pub use persistence::PartialPersistence;
pub use schema::{FieldError, ProfileField};
pub use session::{SessionError, SessionRegistry};
pub use steps::{StepDefinition, StepId, StepTable};

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("step {step} has incomplete fields")]
    StepIncomplete { step: StepId, errors: Vec<FieldError> },

    #[error("profile has incomplete fields, first at step {first_invalid_step}")]
    ProfileIncomplete {
        first_invalid_step: StepId,
        errors: Vec<FieldError>,
    },

    #[error("step {0} does not exist")]
    StepOutOfRange(StepId),

    #[error("profile can only be submitted from the last step")]
    NotOnLastStep,

    #[error("profile is {0} and cannot be submitted")]
    NotSubmittable(ProfileStatus),

    #[error("profile is {0} and cannot be edited")]
    NotEditable(ProfileStatus),

    #[error("profile could not be saved: {0}")]
    Persistence(#[from] DatabaseError),
}

impl WizardError {
    /// Only storage failures are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WizardError::Persistence(_))
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            WizardError::StepIncomplete { errors, .. }
            | WizardError::ProfileIncomplete { errors, .. } => errors,
            _ => &[],
        }
    }
}
