use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::{current_user::USER_ID_HEADER, language_middleware, observability_middleware},
    modules::{
        address::address_routes,
        i18n::create_i18n_routes,
        wizard::{session_routes, wizard_routes},
    },
};

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.env.app.allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/session", session_routes())
        .nest("/api/wizard", wizard_routes())
        .nest("/api/address", address_routes())
        .nest("/api/i18n", create_i18n_routes())
        .layer(middleware::from_fn(language_middleware))
        .layer(middleware::from_fn(observability_middleware))
        .layer(cors)
        .with_state(state)
}

/// Permissive without configured origins, otherwise restricted to them.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT_LANGUAGE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static("x-language"),
        ])
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, store_status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let body = json!({
        "status": if status == StatusCode::OK { "ok" } else { "degraded" },
        "timestamp": OffsetDateTime::now_utc().format(&Rfc3339).ok(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "store": {
                "backend": state.store.backend(),
                "status": store_status,
            },
            "address_lookup": state.address_lookup.is_some(),
        },
        "active_sessions": state.sessions.active_sessions(),
    });

    (status, Json(body))
}
