//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{
    Result,
    config::{
        Settings,
        settings::{EnvLookup, process_env},
    },
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default location of the configuration file, e.g. `~/.config/disguise/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("disguise").join("config.toml"))
}

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Create new configuration loader reading the process environment
    pub fn new() -> Self {
        Self::with_env(process_env)
    }

    /// Loader that reads environment overrides through `env`
    pub fn with_env(env: EnvLookup) -> Self {
        Self {
            defaults: Settings::default(),
            env,
        }
    }

    /// Load configuration with precedence order:
    /// 1. Environment variables (highest priority)
    /// 2. Configuration file
    /// 3. Default values (lowest priority)
    ///
    /// Command line flags are applied on top by the caller.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
        }

        debug!("Applying environment variable overrides");
        settings = settings.merge_with(self.env)?;

        settings.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load from the explicit path, or the default location when it exists
    pub fn load_default(&self, config_file: Option<&Path>) -> Result<Settings> {
        match config_file {
            Some(path) => self.load(Some(path)),
            None => {
                let fallback = default_config_path().filter(|path| path.exists());
                self.load(fallback.as_deref())
            }
        }
    }

    /// Load configuration from environment only
    pub fn from_env_only(&self) -> Result<Settings> {
        let settings = self.defaults.clone().merge_with(self.env)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, identity::Platform};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_defaults() {
        let loader = ConfigLoader::with_env(no_env);
        let settings = loader.from_env_only().unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(loader.defaults().api.api_version, "v9");
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[api]
base_url = "http://localhost:8080"
registering = true

[network]
proxy = "http://127.0.0.1:3128"

[identity]
platform = "Linux"
fingerprint = false
        "#
        )
        .unwrap();

        let loader = ConfigLoader::with_env(no_env);
        let settings = loader.load(Some(temp_file.path())).unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:8080");
        assert!(settings.api.registering);
        assert_eq!(settings.network.proxy.as_deref(), Some("http://127.0.0.1:3128"));
        assert_eq!(settings.identity.platform, Platform::Linux);
        assert!(!settings.identity.fingerprint);
        assert_eq!(settings.api.api_version, "v9");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_env(no_env);
        let settings = loader.load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_env_var_override() {
        fn env(key: &str) -> Option<String> {
            match key {
                "DISGUISE_API_VERSION" => Some("v10".to_string()),
                "DISGUISE_PROXY" => Some("http://envproxy:8080".to_string()),
                _ => None,
            }
        }

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            "[api]\napi_version = \"v8\"\n\n[network]\nproxy = \"http://fileproxy:8080\""
        )
        .unwrap();

        let loader = ConfigLoader::with_env(env);
        let settings = loader.load(Some(temp_file.path())).unwrap();

        assert_eq!(settings.api.api_version, "v10");
        assert_eq!(settings.network.proxy.as_deref(), Some("http://envproxy:8080"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[api\nbase_url = ").unwrap();

        let loader = ConfigLoader::with_env(no_env);
        let result = loader.load(Some(temp_file.path()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validation_runs_after_merge() {
        fn env(key: &str) -> Option<String> {
            (key == "DISGUISE_BASE_URL").then(|| "nonsense".to_string())
        }

        let loader = ConfigLoader::with_env(env);
        assert!(loader.from_env_only().is_err());
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("disguise/config.toml"));
        }
    }
}
