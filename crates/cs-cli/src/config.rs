//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use cs_core::SessionThresholds;
use cs_core::sessionize::{DEFAULT_LONG_GAP_MINUTES, DEFAULT_SHORT_GAP_MINUTES};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Gap in minutes above which a new short session starts.
    pub session_gap_short_minutes: u32,

    /// Gap in minutes above which a new long session starts.
    pub session_gap_long_minutes: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("session_gap_short_minutes", &self.session_gap_short_minutes)
            .field("session_gap_long_minutes", &self.session_gap_long_minutes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("cs.db"),
            session_gap_short_minutes: DEFAULT_SHORT_GAP_MINUTES,
            session_gap_long_minutes: DEFAULT_LONG_GAP_MINUTES,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CS_*)
        figment = figment.merge(Env::prefixed("CS_"));

        figment.extract()
    }

    /// Session thresholds from config, with per-invocation overrides.
    pub fn thresholds(&self, short: Option<u32>, long: Option<u32>) -> SessionThresholds {
        SessionThresholds {
            short_minutes: short.unwrap_or(self.session_gap_short_minutes),
            long_minutes: long.unwrap_or(self.session_gap_long_minutes),
        }
    }
}

/// Returns the platform-specific config directory for cs.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cs"))
}

/// Returns the platform-specific data directory for cs.
///
/// On Linux: `~/.local/share/cs`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("cs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_cs() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "cs");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("cs.db"));
    }

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.thresholds(None, None), SessionThresholds::default());
    }

    #[test]
    fn test_threshold_overrides() {
        let config = Config::default();
        let thresholds = config.thresholds(Some(15), None);
        assert_eq!(thresholds.short_minutes, 15);
        assert_eq!(thresholds.long_minutes, 180);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/chats.db\"\nsession_gap_short_minutes = 30\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/chats.db"));
        assert_eq!(config.session_gap_short_minutes, 30);
        assert_eq!(config.session_gap_long_minutes, 180);
    }
}
