use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::address::{lookup_zip_code, AddressInfo, AddressLookupError};
use crate::app_state::AppState;
use crate::error::{AppResult, LocalizeErr};
use crate::i18n::I18n;

pub async fn lookup_address(
    State(state): State<AppState>,
    i18n: I18n,
    Path(zip_code): Path<String>,
) -> AppResult<Json<AddressInfo>> {
    let lookup = state
        .address_lookup
        .as_deref()
        .ok_or_else(|| AddressLookupError::Unavailable("address lookup is disabled".to_string()))
        .localized(&i18n)?;

    let address = lookup_zip_code(lookup, &zip_code).await.localized(&i18n)?;
    Ok(Json(address))
}
