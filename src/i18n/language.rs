use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use unic_langid::{langid, LanguageIdentifier};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    #[default]
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "en")]
    English,
}

impl SupportedLanguage {
    pub fn all() -> &'static [SupportedLanguage] {
        &[SupportedLanguage::Portuguese, SupportedLanguage::English]
    }

    pub fn code(&self) -> &'static str {
        match self {
            SupportedLanguage::Portuguese => "pt",
            SupportedLanguage::English => "en",
        }
    }

    /// Language identifier for Fluent
    pub fn lang_id(&self) -> LanguageIdentifier {
        match self {
            SupportedLanguage::Portuguese => langid!("pt-BR"),
            SupportedLanguage::English => langid!("en-US"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Portuguese => "Português",
            SupportedLanguage::English => "English",
        }
    }

    /// First supported language in an Accept-Language header, in listed order.
    pub fn from_accept_language(accept_language: &str) -> Self {
        for lang_part in accept_language.split(',') {
            let lang = lang_part.trim().split(';').next().unwrap_or("").to_lowercase();

            if lang.starts_with("pt") {
                return SupportedLanguage::Portuguese;
            } else if lang.starts_with("en") {
                return SupportedLanguage::English;
            }
        }

        Self::default()
    }
}

impl Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SupportedLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "portuguese" | "português" => Ok(SupportedLanguage::Portuguese),
            "en" | "en-us" | "english" => Ok(SupportedLanguage::English),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}
