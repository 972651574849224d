use serde::{Deserialize, Serialize};

/// The closed set of UI locales the form ships translations for.
///
/// Also drives the prompt's target language, so an unrecognized or
/// absent code must degrade to English rather than fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
    Ru,
    Ua,
}

impl Locale {
    /// Maps a locale code to a variant, falling back to `En` for
    /// anything outside the known set.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "es" => Self::Es,
            "fr" => Self::Fr,
            "ru" => Self::Ru,
            "ua" => Self::Ua,
            _ => Self::En,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Ru => "ru",
            Self::Ua => "ua",
        }
    }

    /// Natural-language name used when asking the model to answer in
    /// this locale's language.
    #[must_use]
    pub const fn target_language(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::Ru => "Russian",
            Self::Ua => "Ukrainian",
        }
    }
}
