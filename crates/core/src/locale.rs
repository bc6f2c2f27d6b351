//! Display-language context
//!
//! The selected locale is plain data handed to whatever renders text; it is
//! never stored in a global. Persisting the choice across sessions is an
//! explicit call to [`LocaleStore::save`].

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, the language clinic summaries are written in
    #[default]
    En,
    /// Spanish, served from the translated summary when present
    Es,
}

impl Locale {
    /// All supported locales
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Es];

    /// Two-letter language code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Name of the language in that language
    #[must_use]
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_lowercase();
        // Accept region-qualified tags such as "es-MX"
        match code.split(['-', '_']).next().unwrap_or_default() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            _ => Err(Error::new(ErrorCode::InvalidLocale, format!("Unsupported locale: {s}"))
                .with_suggestion("Use one of: en, es")),
        }
    }
}

/// File-backed persistence for the chosen locale
#[derive(Debug, Clone)]
pub struct LocaleStore {
    path: PathBuf,
}

impl LocaleStore {
    /// Store in the user's configuration directory
    #[must_use]
    pub fn user_default() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("clinicfinder")
            .join("locale");
        Self { path }
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the locale is persisted
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted locale, falling back to the default when nothing
    /// (or something unreadable) has been saved
    #[must_use]
    pub fn load(&self) -> Locale {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.parse().unwrap_or_else(|e| {
                debug!(path = %self.path.display(), error = %e, "Ignoring stored locale");
                Locale::default()
            }),
            Err(_) => Locale::default(),
        }
    }

    /// Persist a locale choice
    pub fn save(&self, locale: Locale) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, locale.code())?;
        debug!(path = %self.path.display(), locale = %locale, "Saved locale");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Es);
        assert_eq!("es-MX".parse::<Locale>().unwrap(), Locale::Es);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocaleStore::at(dir.path().join("nested").join("locale"));

        assert_eq!(store.load(), Locale::En);
        store.save(Locale::Es).unwrap();
        assert_eq!(store.load(), Locale::Es);
    }

    #[test]
    fn test_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locale");
        std::fs::write(&path, "klingon").unwrap();

        assert_eq!(LocaleStore::at(path).load(), Locale::En);
    }
}
