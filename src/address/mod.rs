//! Postal code (CEP) lookup used to pre-fill the address step.

mod via_cep;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::models::ProfileDraft;

pub use via_cep::ViaCepClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub zip_code: String,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Error)]
pub enum AddressLookupError {
    #[error("'{0}' is not a valid CEP")]
    InvalidZipCode(String),

    #[error("CEP {0} was not found")]
    NotFound(String),

    #[error("address service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// `zip_code` is always the 8-digit normalized form.
    async fn lookup(&self, zip_code: &str) -> Result<AddressInfo, AddressLookupError>;
}

/// The 8 digits of a CEP typed as `01310-100`, `01310100` or `01.310-100`.
pub fn normalize_zip_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().any(|c| !(c.is_ascii_digit() || c == '-' || c == '.')) {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == 8).then_some(digits)
}

pub async fn lookup_zip_code(
    lookup: &dyn AddressLookup,
    raw: &str,
) -> Result<AddressInfo, AddressLookupError> {
    let zip_code =
        normalize_zip_code(raw).ok_or_else(|| AddressLookupError::InvalidZipCode(raw.to_string()))?;
    lookup.lookup(&zip_code).await
}

/// Best-effort autofill of the address step from the draft's zip code.
///
/// Returns `Ok(false)` when the zip code is not CEP-shaped yet. On any
/// failure the draft is left exactly as it was.
pub async fn autofill_address(
    draft: &mut ProfileDraft,
    lookup: &dyn AddressLookup,
) -> Result<bool, AddressLookupError> {
    let Some(zip_code) = draft.zip_code.as_deref().and_then(normalize_zip_code) else {
        return Ok(false);
    };

    let address = match lookup.lookup(&zip_code).await {
        Ok(address) => address,
        Err(err) => {
            warn!(zip_code = %zip_code, error = %err, "Address autofill failed");
            return Err(err);
        }
    };

    if address.street.is_some() {
        draft.street = address.street;
    }
    if address.neighborhood.is_some() {
        draft.neighborhood = address.neighborhood;
    }
    draft.city = Some(address.city);
    draft.state = Some(address.state);
    debug!(zip_code = %zip_code, "Address filled from CEP");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup(Option<AddressInfo>);

    #[async_trait]
    impl AddressLookup for FixedLookup {
        async fn lookup(&self, zip_code: &str) -> Result<AddressInfo, AddressLookupError> {
            self.0
                .clone()
                .ok_or_else(|| AddressLookupError::NotFound(zip_code.to_string()))
        }
    }

    fn paulista() -> AddressInfo {
        AddressInfo {
            zip_code: "01310100".to_string(),
            street: Some("Avenida Paulista".to_string()),
            neighborhood: Some("Bela Vista".to_string()),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn zip_codes_are_normalized_to_eight_digits() {
        assert_eq!(normalize_zip_code("01310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_zip_code(" 01.310-100 ").as_deref(), Some("01310100"));
        assert_eq!(normalize_zip_code("0131010"), None);
        assert_eq!(normalize_zip_code("01310-10a"), None);
    }

    #[tokio::test]
    async fn autofill_fills_address_fields() {
        let mut draft = ProfileDraft {
            zip_code: Some("01310-100".to_string()),
            street_number: Some("1000".to_string()),
            ..Default::default()
        };
        let filled = autofill_address(&mut draft, &FixedLookup(Some(paulista())))
            .await
            .unwrap();

        assert!(filled);
        assert_eq!(draft.street.as_deref(), Some("Avenida Paulista"));
        assert_eq!(draft.city.as_deref(), Some("São Paulo"));
        assert_eq!(draft.street_number.as_deref(), Some("1000"));
    }

    #[tokio::test]
    async fn autofill_skips_partial_zip_codes() {
        let mut draft = ProfileDraft {
            zip_code: Some("0131".to_string()),
            ..Default::default()
        };
        let filled = autofill_address(&mut draft, &FixedLookup(Some(paulista())))
            .await
            .unwrap();
        assert!(!filled);
        assert_eq!(draft.city, None);
    }

    #[tokio::test]
    async fn failed_lookup_leaves_draft_untouched() {
        let mut draft = ProfileDraft {
            zip_code: Some("99999-999".to_string()),
            city: Some("Campinas".to_string()),
            ..Default::default()
        };
        let before = draft.clone();
        let err = autofill_address(&mut draft, &FixedLookup(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AddressLookupError::NotFound(_)));
        assert_eq!(draft, before);
    }
}
