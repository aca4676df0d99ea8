use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fluent_bundle::FluentValue;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::address::AddressLookupError;
use crate::i18n::I18n;
use crate::i18n_args;
use crate::wizard::{FieldError, SessionError, StepId, WizardError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Address(#[from] AddressLookupError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Wizard(err) => match err {
                WizardError::StepIncomplete { .. } | WizardError::ProfileIncomplete { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                WizardError::StepOutOfRange(_) => StatusCode::BAD_REQUEST,
                WizardError::NotOnLastStep
                | WizardError::NotSubmittable(_)
                | WizardError::NotEditable(_) => StatusCode::CONFLICT,
                WizardError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Session(SessionError::Busy) => StatusCode::CONFLICT,
            AppError::Address(err) => match err {
                AddressLookupError::InvalidZipCode(_) => StatusCode::BAD_REQUEST,
                AddressLookupError::NotFound(_) => StatusCode::NOT_FOUND,
                AddressLookupError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Wizard(err) => match err {
                WizardError::StepIncomplete { .. } => "step_incomplete",
                WizardError::ProfileIncomplete { .. } => "profile_incomplete",
                WizardError::StepOutOfRange(_) => "step_out_of_range",
                WizardError::NotOnLastStep => "not_on_last_step",
                WizardError::NotSubmittable(_) => "not_submittable",
                WizardError::NotEditable(_) => "not_editable",
                WizardError::Persistence(_) => "save_failed",
            },
            AppError::Session(SessionError::NotFound(_)) => "session_not_found",
            AppError::Session(SessionError::Busy) => "busy",
            AppError::Address(err) => match err {
                AddressLookupError::InvalidZipCode(_) => "invalid_zip_code",
                AddressLookupError::NotFound(_) => "zip_code_not_found",
                AddressLookupError::Unavailable(_) => "address_lookup_unavailable",
            },
            AppError::Authentication(_) => "unauthenticated",
            AppError::BadRequest(_) => "bad_request",
        }
    }

    /// The same request may succeed if sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Wizard(err) => err.is_retryable(),
            AppError::Session(SessionError::Busy) => true,
            AppError::Address(AddressLookupError::Unavailable(_)) => true,
            _ => false,
        }
    }

    fn step(&self) -> Option<StepId> {
        match self {
            AppError::Wizard(WizardError::StepIncomplete { step, .. }) => Some(*step),
            AppError::Wizard(WizardError::ProfileIncomplete {
                first_invalid_step, ..
            }) => Some(*first_invalid_step),
            AppError::Wizard(WizardError::StepOutOfRange(step)) => Some(*step),
            _ => None,
        }
    }

    fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Wizard(err) => err.field_errors(),
            _ => &[],
        }
    }

    fn message_key(&self) -> (&'static str, HashMap<String, FluentValue<'static>>) {
        match self {
            AppError::Wizard(err) => match err {
                WizardError::StepIncomplete { step, .. } => {
                    ("wizard-step-incomplete", i18n_args!("step" => *step))
                }
                WizardError::ProfileIncomplete {
                    first_invalid_step, ..
                } => (
                    "wizard-profile-incomplete",
                    i18n_args!("step" => *first_invalid_step),
                ),
                WizardError::StepOutOfRange(step) => {
                    ("wizard-step-out-of-range", i18n_args!("step" => *step))
                }
                WizardError::NotOnLastStep => ("wizard-not-on-last-step", HashMap::new()),
                WizardError::NotSubmittable(status) => (
                    "wizard-not-submittable",
                    i18n_args!("status" => status.as_str()),
                ),
                WizardError::NotEditable(status) => (
                    "wizard-not-editable",
                    i18n_args!("status" => status.as_str()),
                ),
                WizardError::Persistence(_) => ("wizard-save-failed", HashMap::new()),
            },
            AppError::Session(SessionError::NotFound(_)) => ("session-not-found", HashMap::new()),
            AppError::Session(SessionError::Busy) => ("session-busy", HashMap::new()),
            AppError::Address(err) => match err {
                AddressLookupError::InvalidZipCode(_) => ("address-invalid-zip", HashMap::new()),
                AddressLookupError::NotFound(_) => ("address-not-found", HashMap::new()),
                AddressLookupError::Unavailable(_) => ("address-lookup-failed", HashMap::new()),
            },
            AppError::Authentication(_) => ("auth-missing-user", HashMap::new()),
            AppError::BadRequest(_) => ("error-bad-request", HashMap::new()),
        }
    }

    /// Render the error in the caller's language.
    pub fn localize(self, i18n: &I18n) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let (key, args) = self.message_key();
        let fields = self
            .field_errors()
            .iter()
            .map(|error| FieldErrorBody {
                field: error.field.name(),
                code: error.code().to_string(),
                message: i18n.get(&field_message_key(error.code())),
                params: error
                    .error
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            })
            .collect();

        ApiError {
            status,
            body: ErrorBody {
                code: self.code(),
                message: i18n.get_with_args(key, &args),
                details: self.to_string(),
                retryable: self.is_retryable(),
                step: self.step(),
                fields,
            },
        }
    }
}

/// `invalid_entry` -> `field-invalid-entry`
fn field_message_key(code: &str) -> String {
    format!("field-{}", code.replace('_', "-"))
}

#[derive(Debug, Serialize)]
pub struct FieldErrorBody {
    pub field: &'static str,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorBody>,
}

/// An [`AppError`] already rendered for the caller.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.body }))).into_response()
    }
}

pub trait LocalizeErr<T> {
    fn localized(self, i18n: &I18n) -> Result<T, ApiError>;
}

impl<T, E> LocalizeErr<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn localized(self, i18n: &I18n) -> Result<T, ApiError> {
        self.map_err(|err| err.into().localize(i18n))
    }
}

pub type AppResult<T> = Result<T, ApiError>;
