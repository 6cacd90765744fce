//! User-facing strings, localized

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Id => write!(f, "id"),
        }
    }
}

/// Strings shown to the user when a request cannot go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub locale: Locale,
    pub missing_cv_for_match: &'static str,
    pub missing_cv_for_analysis: &'static str,
    pub missing_cv_for_improver: &'static str,
    pub job_description_too_short: &'static str,
    pub generic_failure: &'static str,
}

const ENGLISH: Messages = Messages {
    locale: Locale::En,
    missing_cv_for_match: "Please upload your CV (PDF format) first.",
    missing_cv_for_analysis: "Please upload a CV first.",
    missing_cv_for_improver: "Please upload your CV (PDF) first.",
    job_description_too_short: "Job description is too short. Add at least 30 characters.",
    generic_failure: "Something went wrong.",
};

const INDONESIAN: Messages = Messages {
    locale: Locale::Id,
    missing_cv_for_match: "Silakan upload CV kamu (format PDF).",
    missing_cv_for_analysis: "Silakan upload CV terlebih dahulu.",
    missing_cv_for_improver: "Silakan upload CV (PDF) terlebih dahulu.",
    job_description_too_short: "Job description terlalu pendek. Tambahkan minimal 30 karakter.",
    generic_failure: "Terjadi kesalahan.",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => ENGLISH,
            Locale::Id => INDONESIAN,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_selects_table() {
        assert_eq!(Messages::for_locale(Locale::Id).generic_failure, "Terjadi kesalahan.");
        assert_eq!(Messages::default().locale, Locale::En);
    }

    #[test]
    fn test_locale_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            locale: Locale,
        }
        let w: Wrapper = toml::from_str("locale = \"id\"").unwrap();
        assert_eq!(w.locale, Locale::Id);
    }
}
