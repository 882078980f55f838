use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LockboxError, Result};

/// User-level configuration, loaded from `<home>/.lockbox.toml`.
///
/// Every field has a sensible default so Lockbox works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the key record and the secrets database.
    /// Defaults to `<home>/.lockbox` when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Name of the config file we look for in the home directory.
    const FILE_NAME: &'static str = ".lockbox.toml";

    /// Load settings from `<home>/.lockbox.toml`.
    ///
    /// If the file does not exist, defaults are returned. If the file
    /// exists but cannot be parsed, an error is returned.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LockboxError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the data directory, falling back to `<home>/.lockbox`.
    pub fn data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => home.join(".lockbox"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".lockbox.toml"),
            "data_dir = \"/var/lib/lockbox\"\n",
        )
        .unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(
            settings.data_dir.as_deref(),
            Some(Path::new("/var/lib/lockbox"))
        );
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".lockbox.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn data_dir_defaults_under_home() {
        let settings = Settings::default();
        let home = Path::new("/home/user");
        assert_eq!(settings.data_dir(home), PathBuf::from("/home/user/.lockbox"));
    }

    #[test]
    fn data_dir_respects_override() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
        };
        let home = Path::new("/home/user");
        assert_eq!(settings.data_dir(home), PathBuf::from("/tmp/elsewhere"));
    }
}
