//! User settings
//!
//! Display preferences and audit toggle, stored as `cache/settings.json`.

use serde::{Deserialize, Serialize};

use super::paths::CachePaths;
use crate::error::TripError;
use crate::models::Money;

/// User settings for the trip planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Label appended to formatted amounts
    #[serde(default = "default_currency_label")]
    pub currency_label: String,

    /// Separator placed between thousands groups
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    /// Whether manager changes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_label() -> String {
    "VND".to_string()
}

fn default_thousands_separator() -> char {
    '.'
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_label: default_currency_label(),
            thousands_separator: default_thousands_separator(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Format an amount using the configured separator and label
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(self.thousands_separator, &self.currency_label)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CachePaths) -> Result<Self, TripError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TripError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TripError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CachePaths) -> Result<(), TripError> {
        paths.ensure_cache_dir()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TripError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TripError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_label, "VND");
        assert_eq!(settings.thousands_separator, '.');
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CachePaths::with_working_dir(temp_dir.path());

        let mut settings = Settings::default();
        settings.currency_label = "đ".into();
        settings.audit_enabled = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_label, "đ");
        assert!(!loaded.audit_enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CachePaths::with_working_dir(temp_dir.path());
        paths.ensure_cache_dir().unwrap();
        std::fs::write(paths.settings_file(), r#"{"audit_enabled": false}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.audit_enabled);
        assert_eq!(loaded.currency_label, "VND");
        assert_eq!(loaded.schema_version, 1);
    }

    #[test]
    fn test_format_money() {
        let settings = Settings::default();
        assert_eq!(
            settings.format_money(Money::from_vnd(1_500_000)),
            "1.500.000 VND"
        );
    }
}
