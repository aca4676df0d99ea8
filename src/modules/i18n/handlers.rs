use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::app_state::AppState;
use crate::i18n::{extract_translations_for_client, I18n, SupportedLanguage};

/// Keys the profile screens need when the client asks for none in particular.
const DEFAULT_KEYS: &[&str] = &[
    "app-name",
    "step-personal",
    "step-documents",
    "step-address",
    "step-experience",
    "step-rental",
    "step-qualifications",
    "wizard-saved",
    "wizard-save-failed",
    "wizard-submitted",
    "session-busy",
    "address-lookup-failed",
];

#[derive(Debug, Deserialize)]
pub struct TranslationQuery {
    /// Comma-separated list of keys
    pub keys: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub is_default: bool,
}

impl From<SupportedLanguage> for LanguageInfo {
    fn from(language: SupportedLanguage) -> Self {
        Self {
            code: language.code().to_string(),
            name: language.name().to_string(),
            is_default: language == SupportedLanguage::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportedLanguagesResponse {
    pub languages: Vec<LanguageInfo>,
    pub default_language: String,
    pub current_language: String,
}

#[derive(Debug, Serialize)]
pub struct TranslationsResponse {
    pub translations: HashMap<String, String>,
    pub language: String,
    pub requested_keys: Vec<String>,
}

pub async fn get_supported_languages(i18n: I18n) -> Json<SupportedLanguagesResponse> {
    Json(SupportedLanguagesResponse {
        languages: i18n
            .localizer
            .supported_languages()
            .iter()
            .copied()
            .map(LanguageInfo::from)
            .collect(),
        default_language: i18n.localizer.default_language().code().to_string(),
        current_language: i18n.language().code().to_string(),
    })
}

/// Translations for the requested keys; unknown keys are left out.
pub async fn get_translations(
    State(state): State<AppState>,
    i18n: I18n,
    Query(query): Query<TranslationQuery>,
) -> Json<TranslationsResponse> {
    // An explicit ?language= wins over the request headers
    let language = query
        .language
        .and_then(|lang| lang.parse::<SupportedLanguage>().ok())
        .unwrap_or_else(|| i18n.language());

    let keys: Vec<String> = match query.keys {
        Some(keys) => keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
    };
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();

    let translations = extract_translations_for_client(&state.localizer, language, &key_refs);

    Json(TranslationsResponse {
        translations,
        language: language.code().to_string(),
        requested_keys: keys,
    })
}
