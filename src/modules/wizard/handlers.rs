use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::address::{autofill_address, normalize_zip_code, AddressLookupError};
use crate::app_state::AppState;
use crate::db::models::ProfileDraft;
use crate::error::{AppError, AppResult, LocalizeErr};
use crate::i18n::I18n;
use crate::middleware::CurrentUser;
use crate::wizard::schema::Requirement;
use crate::wizard::{ProfileWizard, StepId, StepTable, WizardView};

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Inline message for the client to show next to the form.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
}

impl Notice {
    fn info(i18n: &I18n, code: &'static str, key: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            code,
            message: i18n.get(key),
        }
    }

    fn warning(i18n: &I18n, code: &'static str, key: &str) -> Self {
        Self {
            level: NoticeLevel::Warning,
            code,
            message: i18n.get(key),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub wizard: WizardView,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub closed: bool,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub notice: Notice,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub wizard: WizardView,
}

#[derive(Debug, Serialize)]
pub struct StepInfo {
    pub id: StepId,
    pub label_key: &'static str,
    pub label: String,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub optional: bool,
    /// Required only in some situations, e.g. the plate for owners.
    pub conditional: bool,
}

/// The wizard's view with step labels in the caller's language.
fn localized_view(wizard: &ProfileWizard, i18n: &I18n) -> WizardView {
    let mut view = wizard.view();
    for step in &mut view.steps {
        step.label = i18n.get(step.label_key);
    }
    view
}

fn respond(wizard: &ProfileWizard, i18n: &I18n, notice: Option<Notice>) -> Json<WizardResponse> {
    Json(WizardResponse {
        notice,
        wizard: localized_view(wizard, i18n),
    })
}

/// Login: load or create the driver's profile and resolve the starting step.
pub async fn open_session(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<WizardResponse>> {
    let handle = state.sessions.login(user_id).await.localized(&i18n)?;
    let wizard = handle.lock().await;
    Ok(respond(
        &wizard,
        &i18n,
        Some(Notice::info(&i18n, "session_opened", "session-opened")),
    ))
}

pub async fn close_session(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> Json<LogoutResponse> {
    let closed = state.sessions.logout(user_id);
    Json(LogoutResponse {
        closed,
        notice: Notice::info(&i18n, "session_closed", "session-closed"),
    })
}

pub async fn get_wizard(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<WizardResponse>> {
    let wizard = state.sessions.wait(user_id).await.localized(&i18n)?;
    Ok(respond(&wizard, &i18n, None))
}

pub async fn list_steps(i18n: I18n) -> Json<Vec<StepInfo>> {
    let table = StepTable::profile();
    let steps = table
        .iter()
        .map(|step| StepInfo {
            id: step.id,
            label_key: step.label_key,
            label: i18n.get(step.label_key),
            fields: step
                .fields
                .iter()
                .map(|field| {
                    let requirement = field.rule().requirement;
                    FieldInfo {
                        name: field.name(),
                        optional: requirement.is_optional(),
                        conditional: matches!(requirement, Requirement::RequiredWhen(_)),
                    }
                })
                .collect(),
        })
        .collect();
    Json(steps)
}

/// Replace the in-memory draft. Fills the address from the CEP when the
/// zip code changed; a failed lookup only adds a warning notice.
pub async fn update_draft(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
    body: Result<Json<ProfileDraft>, JsonRejection>,
) -> AppResult<Json<WizardResponse>> {
    let Json(mut draft) = body
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
        .localized(&i18n)?;
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    wizard.ensure_editable().localized(&i18n)?;

    let zip_changed = draft.zip_code.as_deref().and_then(normalize_zip_code)
        != wizard.draft().zip_code.as_deref().and_then(normalize_zip_code);

    let mut notice = None;
    if zip_changed {
        if let Some(lookup) = state.address_lookup.as_deref() {
            notice = match autofill_address(&mut draft, lookup).await {
                Ok(true) => Some(Notice::info(&i18n, "address_filled", "address-filled")),
                Ok(false) => None,
                Err(AddressLookupError::NotFound(_)) => Some(Notice::warning(
                    &i18n,
                    "zip_code_not_found",
                    "address-not-found",
                )),
                Err(_) => Some(Notice::warning(
                    &i18n,
                    "address_lookup_failed",
                    "address-lookup-failed",
                )),
            };
        }
    }

    wizard.update_draft(draft).localized(&i18n)?;
    Ok(respond(&wizard, &i18n, notice))
}

pub async fn save_progress(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<WizardResponse>> {
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    wizard.save_progress().await.localized(&i18n)?;
    Ok(respond(
        &wizard,
        &i18n,
        Some(Notice::info(&i18n, "saved", "wizard-saved")),
    ))
}

pub async fn next_step(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<WizardResponse>> {
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    wizard.next().await.localized(&i18n)?;
    Ok(respond(&wizard, &i18n, None))
}

pub async fn previous_step(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<WizardResponse>> {
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    wizard.prev().await.localized(&i18n)?;
    Ok(respond(&wizard, &i18n, None))
}

pub async fn go_to_step(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
    step: Result<Path<StepId>, PathRejection>,
) -> AppResult<Json<WizardResponse>> {
    let Path(step) = step
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
        .localized(&i18n)?;
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    wizard.go_to(step).await.localized(&i18n)?;
    Ok(respond(&wizard, &i18n, None))
}

pub async fn submit_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    i18n: I18n,
) -> AppResult<Json<SubmitResponse>> {
    let mut wizard = state.sessions.acquire(user_id).localized(&i18n)?;
    let submitted_at = wizard.submit().await.localized(&i18n)?;
    info!(user_id = %user_id, "Profile handed to moderation");

    Ok(Json(SubmitResponse {
        notice: Notice::info(&i18n, "submitted", "wizard-submitted"),
        submitted_at,
        wizard: localized_view(&wizard, &i18n),
    }))
}
