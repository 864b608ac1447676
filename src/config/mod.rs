//! Engine configuration: detector catalog location, penalty table,
//! Web-Vitals thresholds and advice text.
//!
//! ## Layers
//! - `types`: Configuration type definitions
//! - `loading`: File loading and validation
//! - `error`: Configuration errors

mod error;
mod loading;
mod types;

pub use error::{ConfigError, ConfigFormat, SyntaxError};
pub use loading::CONFIG_FILE_NAMES;
pub use types::EngineConfig;
