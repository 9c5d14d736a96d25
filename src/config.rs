//! Application configuration
//!
//! Handles loading and saving user preferences from prefs.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Preferences file name, looked up in the working directory and next to
/// the executable
const PREFS_FILE: &str = "prefs.json";

/// User preferences persisted between sessions
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Preferences {
    /// Selected theme preset name
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Directory downloaded icons are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Selected icon size in pixels
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_output_dir() -> String {
    "icons".to_string()
}

fn default_size() -> u32 {
    128
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            output_dir: default_output_dir(),
            size: default_size(),
        }
    }
}

impl Preferences {
    /// Load preferences from prefs.json
    pub fn load() -> Self {
        // Try to load from current directory first
        if let Ok(prefs) = Self::load_from_path(PREFS_FILE) {
            log::info!("Loaded preferences from ./{}", PREFS_FILE);
            return prefs;
        }

        // Try to load from executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let prefs_path = exe_dir.join(PREFS_FILE);
                if let Ok(prefs) = Self::load_from_path(&prefs_path) {
                    log::info!("Loaded preferences from {}", prefs_path.display());
                    return prefs;
                }
            }
        }

        log::info!("No {} found, using defaults", PREFS_FILE);
        Self::default()
    }

    fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let prefs: Preferences = serde_json::from_str(&content)?;
        Ok(prefs)
    }

    /// Save preferences to prefs.json in the working directory
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to_path(PREFS_FILE)
    }

    fn save_to_path(&self, path: impl Into<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.into(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, "light");
        assert_eq!(prefs.output_dir, "icons");
        assert_eq!(prefs.size, 128);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = Preferences {
            theme: "mocha".to_string(),
            output_dir: "/tmp/icons".to_string(),
            size: 256,
        };
        prefs.save_to_path(&path).unwrap();

        let loaded = Preferences::load_from_path(&path).unwrap();
        assert_eq!(loaded.theme, "mocha");
        assert_eq!(loaded.output_dir, "/tmp/icons");
        assert_eq!(loaded.size, 256);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let loaded = Preferences::load_from_path(&path).unwrap();
        assert_eq!(loaded.theme, "dark");
        assert_eq!(loaded.output_dir, "icons");
        assert_eq!(loaded.size, 128);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        assert!(Preferences::load_from_path(&path).is_err());
    }
}
