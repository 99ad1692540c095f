//! Client preferences
//!
//! Theme and model selection, persisted under their own storage keys and
//! reloaded before the project collection at startup. Preferences are an
//! explicit struct owned by the command handlers and passed down; they
//! are never ambient state.

use crate::models::DEFAULT_MODEL;
use crate::storage::{keys, KvStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal accent theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Cyan,
    #[default]
    Green,
    Blue,
    Purple,
}

impl Theme {
    /// Color used for themed terminal output
    pub fn color(self) -> colored::Color {
        match self {
            Theme::Cyan => colored::Color::Cyan,
            Theme::Green => colored::Color::Green,
            Theme::Blue => colored::Color::Blue,
            Theme::Purple => colored::Color::Magenta,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Cyan => write!(f, "cyan"),
            Theme::Green => write!(f, "green"),
            Theme::Blue => write!(f, "blue"),
            Theme::Purple => write!(f, "purple"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyan" => Ok(Theme::Cyan),
            "green" => Ok(Theme::Green),
            "blue" => Ok(Theme::Blue),
            "purple" => Ok(Theme::Purple),
            other => Err(format!(
                "unknown theme '{}' (expected cyan, green, blue, or purple)",
                other
            )),
        }
    }
}

/// Theme and model selection for the running client
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub theme: Theme,
    pub selected_model: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            selected_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from the store, defaulting missing or unreadable
    /// entries field by field
    pub fn load(store: &KvStore) -> Self {
        Self {
            theme: store.get(keys::THEME, Theme::default()),
            selected_model: store.get(keys::MODEL, DEFAULT_MODEL.to_string()),
        }
    }

    /// Persist both preferences under their own keys
    pub fn save(&self, store: &KvStore) -> bool {
        let theme_ok = store.set(keys::THEME, &self.theme);
        let model_ok = store.set(keys::MODEL, &self.selected_model);
        theme_ok && model_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> (KvStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = KvStore::open(dir.path().join("store")).expect("failed to open store");
        (store, dir)
    }

    #[test]
    fn test_load_defaults_on_empty_store() {
        let (store, _dir) = create_test_store();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, Theme::Green);
        assert_eq!(prefs.selected_model, DEFAULT_MODEL);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (store, _dir) = create_test_store();
        let prefs = Preferences {
            theme: Theme::Purple,
            selected_model: "gpt-4".to_string(),
        };

        assert!(prefs.save(&store));
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn test_unreadable_theme_falls_back_to_default() {
        let (store, _dir) = create_test_store();
        store.set(keys::THEME, &"mauve");

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, Theme::Green);
    }

    #[test]
    fn test_theme_parses_case_insensitively() {
        assert_eq!("CYAN".parse::<Theme>(), Ok(Theme::Cyan));
        assert_eq!("Blue".parse::<Theme>(), Ok(Theme::Blue));
        assert!("mauve".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&Theme::Purple).unwrap();
        assert_eq!(json, "\"purple\"");
        let parsed: Theme = serde_json::from_str("\"cyan\"").unwrap();
        assert_eq!(parsed, Theme::Cyan);
    }
}
