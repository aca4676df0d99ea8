pub mod fluent_loader;
pub mod helpers;
pub mod language;
pub mod localizer;

pub use fluent_loader::FluentLoader;
pub use helpers::I18n;
pub use language::SupportedLanguage;
pub use localizer::{LocalizedString, Localizer};

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Load every supported language from `locales_dir`.
pub fn init_i18n(locales_dir: impl AsRef<Path>) -> Result<Localizer> {
    let mut loader = FluentLoader::new(locales_dir.as_ref());
    for language in SupportedLanguage::all() {
        loader.load_locale(*language)?;
    }
    Ok(Localizer::new(loader))
}

/// Extract a dictionary of key-value pairs for client-side usage
pub fn extract_translations_for_client(
    localizer: &Localizer,
    language: SupportedLanguage,
    keys: &[&str],
) -> HashMap<String, String> {
    keys.iter()
        .filter_map(|key| {
            localizer
                .get_message_with_language(&language, key, None)
                .ok()
                .map(|translation| (key.to_string(), translation.into_string()))
        })
        .collect()
}
