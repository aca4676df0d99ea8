use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentValue};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::i18n::fluent_loader::FluentLoader;
use crate::i18n::language::SupportedLanguage;

/// A message resolved for one language
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedString {
    value: String,
    language: SupportedLanguage,
}

impl LocalizedString {
    pub fn new(value: String, language: SupportedLanguage) -> Self {
        Self { value, language }
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

pub struct Localizer {
    loader: FluentLoader,
    default_language: SupportedLanguage,
}

impl Localizer {
    pub fn new(loader: FluentLoader) -> Self {
        Self {
            loader,
            default_language: SupportedLanguage::default(),
        }
    }

    /// Resolve `key` for `language`, using the default language's bundle
    /// when that language has none loaded.
    pub fn get_message_with_language(
        &self,
        language: &SupportedLanguage,
        key: &str,
        args: Option<&HashMap<String, FluentValue>>,
    ) -> Result<LocalizedString> {
        let bundle = self
            .loader
            .get_bundle(language)
            .or_else(|| self.loader.get_bundle(&self.default_language))
            .ok_or_else(|| anyhow!("No bundle available for language: {}", language))?;

        let message = bundle
            .get_message(key)
            .ok_or_else(|| anyhow!("Message not found: {}", key))?;

        let pattern = message
            .value()
            .ok_or_else(|| anyhow!("Message has no value: {}", key))?;

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (k, v) in args {
                fluent_args.set(k.clone(), v.clone());
            }
            fluent_args
        });

        let mut errors = Vec::new();
        let formatted = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);

        if !errors.is_empty() {
            tracing::warn!("Fluent formatting errors for key '{}': {:?}", key, errors);
        }

        Ok(LocalizedString::new(formatted.into_owned(), *language))
    }

    /// The message, or the key itself when it is unknown.
    pub fn get_string_for_language(&self, language: &SupportedLanguage, key: &str) -> String {
        self.get_message_with_language(language, key, None)
            .map(LocalizedString::into_string)
            .unwrap_or_else(|_| key.to_string())
    }

    pub fn has_message(&self, language: &SupportedLanguage, key: &str) -> bool {
        self.loader
            .get_bundle(language)
            .map(|bundle| bundle.has_message(key))
            .unwrap_or(false)
    }

    pub fn supported_languages(&self) -> &'static [SupportedLanguage] {
        SupportedLanguage::all()
    }

    pub fn default_language(&self) -> SupportedLanguage {
        self.default_language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n_args;

    fn localizer() -> Localizer {
        let mut loader = FluentLoader::new("does-not-exist");
        loader.load_locale(SupportedLanguage::Portuguese).unwrap();
        loader.load_locale(SupportedLanguage::English).unwrap();
        Localizer::new(loader)
    }

    #[test]
    fn formats_arguments_without_isolation_marks() {
        let localizer = localizer();
        let args = i18n_args!("step" => 3);
        let message = localizer
            .get_message_with_language(&SupportedLanguage::English, "wizard-step-out-of-range", Some(&args))
            .unwrap();
        assert_eq!(message.as_str(), "Step 3 does not exist.");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let localizer = localizer();
        assert_eq!(
            localizer.get_string_for_language(&SupportedLanguage::Portuguese, "no-such-key"),
            "no-such-key"
        );
        assert_eq!(
            localizer.get_string_for_language(&SupportedLanguage::Portuguese, "step-address"),
            "Endereço"
        );
    }
}
