use axum::{routing::get, Router};

use super::handlers::lookup_address;
use crate::app_state::AppState;

pub fn address_routes() -> Router<AppState> {
    Router::new().route("/{zip_code}", get(lookup_address))
}
