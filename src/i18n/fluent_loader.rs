use anyhow::{Context, Result};
use fluent_bundle::{concurrent::FluentBundle, FluentResource};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::language::SupportedLanguage;

pub type Bundle = FluentBundle<FluentResource>;

fn embedded_messages(language: SupportedLanguage) -> &'static str {
    match language {
        SupportedLanguage::Portuguese => include_str!("../../locales/pt/common.ftl"),
        SupportedLanguage::English => include_str!("../../locales/en/common.ftl"),
    }
}

/// Loads and manages Fluent translation resources
pub struct FluentLoader {
    locales_dir: PathBuf,
    bundles: HashMap<SupportedLanguage, Bundle>,
}

impl FluentLoader {
    pub fn new(locales_dir: impl Into<PathBuf>) -> Self {
        Self {
            locales_dir: locales_dir.into(),
            bundles: HashMap::new(),
        }
    }

    /// Load `<locales_dir>/<code>/*.ftl`, falling back to the bundled
    /// messages when the directory is missing or holds no FTL files.
    pub fn load_locale(&mut self, language: SupportedLanguage) -> Result<()> {
        let mut bundle = FluentBundle::new_concurrent(vec![language.lang_id()]);
        // JSON clients get no bidi isolation marks around placeables
        bundle.set_use_isolating(false);

        let locale_dir = self.locales_dir.join(language.code());
        let mut loaded_files = 0;

        if locale_dir.is_dir() {
            let paths = fs::read_dir(&locale_dir)
                .with_context(|| format!("Failed to read locale directory: {:?}", locale_dir))?;

            for path in paths {
                let path = path?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("ftl") {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read file: {:?}", path))?;
                    add_source(&mut bundle, content, &path)?;
                    loaded_files += 1;
                }
            }
        }

        if loaded_files == 0 {
            add_source(
                &mut bundle,
                embedded_messages(language).to_string(),
                Path::new("<embedded>"),
            )?;
            tracing::info!(locale = language.code(), "Loaded embedded messages");
        } else {
            tracing::info!(locale = language.code(), files = loaded_files, "Loaded FTL files");
        }

        self.bundles.insert(language, bundle);
        Ok(())
    }

    pub fn get_bundle(&self, language: &SupportedLanguage) -> Option<&Bundle> {
        self.bundles.get(language)
    }
}

fn add_source(bundle: &mut Bundle, content: String, origin: &Path) -> Result<()> {
    let resource = FluentResource::try_new(content).map_err(|(_, errors)| {
        anyhow::anyhow!("Failed to parse FTL file {:?}: {:?}", origin, errors)
    })?;

    bundle
        .add_resource(resource)
        .map_err(|errors| anyhow::anyhow!("Failed to add {:?} to bundle: {:?}", origin, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_falls_back_to_embedded_messages() {
        let mut loader = FluentLoader::new("does-not-exist");
        loader.load_locale(SupportedLanguage::English).unwrap();
        let bundle = loader.get_bundle(&SupportedLanguage::English).unwrap();
        assert!(bundle.has_message("step-personal"));
    }

    #[test]
    fn embedded_bundles_share_their_keys() {
        let mut loader = FluentLoader::new("does-not-exist");
        loader.load_locale(SupportedLanguage::Portuguese).unwrap();
        loader.load_locale(SupportedLanguage::English).unwrap();
        let pt = loader.get_bundle(&SupportedLanguage::Portuguese).unwrap();
        let en = loader.get_bundle(&SupportedLanguage::English).unwrap();

        for key in ["wizard-saved", "wizard-save-failed", "session-busy", "field-required"] {
            assert!(pt.has_message(key), "pt lacks {key}");
            assert!(en.has_message(key), "en lacks {key}");
        }
    }
}
