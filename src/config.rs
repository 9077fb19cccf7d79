use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{Identifier, RichText, TipsError};

pub const DEFAULT_CYCLE_TIME_MS: u32 = 5000;

/// User settings for tip loading and rotation.
///
/// Stored as camelCase JSON. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TipsConfig {
    /// Display time in milliseconds for tips that do not set `cycleTime`.
    pub default_cycle_time: u32,
    /// Tips from these namespaces are never loaded.
    pub ignored_namespaces: Vec<String>,
    /// Tips with these ids are never loaded.
    pub ignored_tips: Vec<Identifier>,
    /// Title for tips that do not set one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_title: Option<RichText>,
}

impl Default for TipsConfig {
    fn default() -> Self {
        Self {
            default_cycle_time: DEFAULT_CYCLE_TIME_MS,
            ignored_namespaces: Vec::new(),
            ignored_tips: Vec::new(),
            default_title: None,
        }
    }
}

impl TipsConfig {
    /// Parse a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TipsError::Json`] if the text is not a valid config.
    pub fn from_json_str(input: &str) -> Result<Self, TipsError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load the config at `path`, falling back to defaults if it is missing
    /// or unreadable, then write the effective config back so new keys show
    /// up in the file. Failures are logged and never returned.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let config = if path.exists() {
            match fs::read_to_string(path)
                .map_err(TipsError::from)
                .and_then(|content| Self::from_json_str(&content))
            {
                Ok(config) => {
                    info!(path = %path.display(), "loaded config file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read config file, using defaults");
                    Self::default()
                }
            }
        } else {
            info!(path = %path.display(), "creating a new config file");
            Self::default()
        };

        if let Err(e) = config.save(path) {
            error!(path = %path.display(), error = %e, "could not write config file");
        }

        config
    }

    /// Write the config as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`TipsError`] on serialization or I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TipsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn default_cycle_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.default_cycle_time))
    }

    /// Whether a tip with this id should be skipped at load time.
    #[must_use]
    pub fn is_ignored(&self, id: &Identifier) -> bool {
        self.ignored_namespaces.iter().any(|ns| ns == id.namespace())
            || self.ignored_tips.contains(id)
    }
}
