//! Reading and writing the settings file.

use crate::types::{ConfigError, ConfigResult, Settings};
use std::path::Path;
use tracing::debug;

impl Settings {
    /// Parse and validate settings from YAML.
    ///
    /// An empty document yields the default settings.
    pub fn from_yaml_str(source: &str) -> ConfigResult<Self> {
        if source.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate the settings file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&source)?;
        debug!(
            path = %path.display(),
            defaults = settings.defaults.len(),
            profiles = settings.profiles.len(),
            "loaded settings"
        );
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate and write the settings to `path`.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let yaml = self.to_yaml_string()?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{ConfigError, DeviceProfile, Settings};
    use linkvars_template::{RoutePreference, SUPPRESSED};

    const SAMPLE: &str = r#"
substitution: "-"
defaults:
  SERVER1: https://server1.com
  RCLONE: /mnt/rclone
preferences:
  RCLONE:
    rich: false
profiles:
  - name: laptop
    path: /home/me/vault
    overrides:
      RCLONE: __IGNORE__
  - name: desktop
"#;

    #[test]
    fn test_parse_sample() {
        let settings = Settings::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(settings.substitution, "-");
        assert_eq!(settings.defaults.len(), 2);
        assert_eq!(
            settings.preferences.get("RCLONE"),
            Some(&RoutePreference::new(false, true))
        );
        assert_eq!(settings.profiles.len(), 2);
        assert_eq!(
            settings.profiles[0].overrides.get("RCLONE").map(String::as_str),
            Some(SUPPRESSED)
        );
        assert!(settings.profiles[1].overrides.is_empty());
        assert!(settings.profiles[1].path.is_none());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml_str("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let err = Settings::from_yaml_str("defaults:\n  'a:b': x\n").unwrap_err();
        assert!(matches!(err, ConfigError::ReservedCharacter { .. }));

        let err = Settings::from_yaml_str("defaults: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let mut settings = Settings::default();
        settings.set_default("API", "/api").unwrap();
        settings
            .add_profile(DeviceProfile::new("laptop").with_path("/vault"))
            .unwrap();
        settings.ignore_on("laptop", "API").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkvars.yml");
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
