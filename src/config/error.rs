//! Configuration error types.

use crate::rules::CatalogError;

/// Syntaxes an engine config file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deserializer failure, kept per format so the source chain stays intact.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Engine configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read engine config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {format} engine config {path}: {source}")]
    Syntax {
        path: String,
        format: ConfigFormat,
        #[source]
        source: SyntaxError,
    },

    #[error("Engine config {path} has extension '.{extension}'; expected yaml, yml, json or toml")]
    UnknownExtension { path: String, extension: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load detector catalog {path}: {source}")]
    Catalog {
        path: String,
        #[source]
        source: CatalogError,
    },
}
