use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    close_session, get_wizard, go_to_step, list_steps, next_step, open_session, previous_step,
    save_progress, submit_profile, update_draft,
};
use crate::app_state::AppState;

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/", post(open_session).delete(close_session))
}

pub fn wizard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wizard))
        .route("/steps", get(list_steps))
        .route("/steps/{step}", post(go_to_step))
        .route("/draft", put(update_draft))
        .route("/save", post(save_progress))
        .route("/next", post(next_step))
        .route("/prev", post(previous_step))
        .route("/submit", post(submit_profile))
}
