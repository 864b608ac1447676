//! Configuration loading functions.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ConfigError, ConfigFormat, SyntaxError};
use super::types::EngineConfig;
use crate::rules::{Catalog, CatalogLoader};

/// Config file names searched by [`EngineConfig::load`], in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".darkux-audit.yaml",
    ".darkux-audit.yml",
    ".darkux-audit.json",
    ".darkux-audit.toml",
];

impl EngineConfig {
    /// Load configuration from a file.
    ///
    /// A relative `catalog` path is resolved against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format =
            ConfigFormat::from_extension(extension).ok_or_else(|| ConfigError::UnknownExtension {
                path: display.clone(),
                extension: extension.to_lowercase(),
            })?;

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        let parsed: Result<Self, SyntaxError> = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(&content).map_err(SyntaxError::from),
            ConfigFormat::Json => serde_json::from_str(&content).map_err(SyntaxError::from),
            ConfigFormat::Toml => toml::from_str(&content).map_err(SyntaxError::from),
        };
        let mut config = parsed.map_err(|source| ConfigError::Syntax {
            path: display,
            format,
            source,
        })?;

        if let Some(catalog) = config.catalog.as_mut()
            && catalog.is_relative()
            && let Some(parent) = path.parent()
        {
            *catalog = parent.join(&*catalog);
        }

        debug!(path = %path.display(), format = %format, "Loaded engine config");
        Ok(config)
    }

    /// Find the first config file present in `project_root`.
    pub fn find_config_file(project_root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| project_root.join(name))
            .find(|path| path.is_file())
    }

    /// Load configuration from the project directory.
    ///
    /// Search order:
    /// 1. `.darkux-audit.yaml` in project root
    /// 2. `.darkux-audit.yml` in project root
    /// 3. `.darkux-audit.json` in project root
    /// 4. `.darkux-audit.toml` in project root
    /// 5. Default configuration
    ///
    /// A config file that exists but fails to load is an error, not a fallback.
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        match project_root.and_then(Self::find_config_file) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject tables that would make scores meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.penalties.validate().map_err(ConfigError::Invalid)?;
        self.web_vitals.validate().map_err(ConfigError::Invalid)
    }

    /// Load the configured detector catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog {
            Some(path) => CatalogLoader::load_from_file(path).map_err(|source| ConfigError::Catalog {
                path: path.display().to_string(),
                source,
            }),
            None => Catalog::builtin().map_err(|source| ConfigError::Catalog {
                path: "<builtin>".to_string(),
                source,
            }),
        }
    }
}
