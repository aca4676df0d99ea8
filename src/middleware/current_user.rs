use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{ApiError, AppError};
use crate::i18n::I18n;

/// Header carrying the authenticated user's id, set by the auth gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The driver making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

fn user_id_from(parts: &Parts) -> Result<Uuid, AppError> {
    let value = parts
        .headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Authentication(format!("missing {} header", USER_ID_HEADER)))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| AppError::Authentication(format!("malformed {} header", USER_ID_HEADER)))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match user_id_from(parts) {
            Ok(user_id) => Ok(CurrentUser(user_id)),
            Err(err) => Err(err.localize(&I18n::from_parts(parts, state))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/wizard");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_the_user_id_header() {
        let id = Uuid::new_v4();
        assert_eq!(user_id_from(&parts(Some(&id.to_string()))).unwrap(), id);
    }

    #[test]
    fn rejects_missing_or_malformed_ids() {
        assert!(matches!(user_id_from(&parts(None)), Err(AppError::Authentication(_))));
        assert!(matches!(
            user_id_from(&parts(Some("driver-42"))),
            Err(AppError::Authentication(_))
        ));
    }
}
