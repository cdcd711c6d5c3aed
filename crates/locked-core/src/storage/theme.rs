use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::history::KvStore;

pub const THEME_KEY: &str = "locked-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Stored preference, or dark when unset or unrecognised.
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Result<Theme, StorageError> {
        Ok(store
            .get(THEME_KEY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or_default())
    }

    pub fn save<S: KvStore + ?Sized>(self, store: &S) -> Result<(), StorageError> {
        store.set(THEME_KEY, &self.to_string())
    }

    /// Flips the stored preference and returns the new one.
    pub fn toggle<S: KvStore + ?Sized>(store: &S) -> Result<Theme, StorageError> {
        let theme = Theme::load(store)?.toggled();
        theme.save(store)?;
        Ok(theme)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;

    #[test]
    fn defaults_to_dark_and_toggles() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Light);
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Dark);
    }

    #[test]
    fn unknown_value_falls_back_to_dark() {
        let store = MemoryStore::new().with_entry(THEME_KEY, "sepia");
        assert_eq!(Theme::load(&store).unwrap(), Theme::Dark);
    }
}
