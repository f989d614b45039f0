use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kscw_calendar::Language;
use serde::{Deserialize, Serialize};

use crate::error::PreferencesError;

/// Persisted user preferences. Read once on startup, written when changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
}

impl Preferences {
    /// `<config dir>/kscw-calendar-proxy/preferences.toml`
    pub fn default_path() -> Result<PathBuf, PreferencesError> {
        dirs::config_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("preferences.toml"))
            .ok_or(PreferencesError::NoConfigDir)
    }

    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.language, Language::De);
    }

    #[test]
    fn saves_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        Preferences {
            language: Language::En,
        }
        .save(&path)
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "language = \"en\"");
        assert_eq!(Preferences::load(&path).unwrap().language, Language::En);
    }

    #[test]
    fn rejects_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "language = \"fr\"\n").unwrap();

        assert!(matches!(
            Preferences::load(&path),
            Err(PreferencesError::Parse(_))
        ));
    }
}
