//! Tracklist configuration
//!
//! Configuration lives in $XDG_CONFIG_HOME/tracklist/config.toml unless
//! `--config` or $TRACKLIST_CONFIG point elsewhere. A missing file means
//! defaults; a malformed file is an invocation error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracklist_common::query::DEFAULT_APP;
use tracklist_common::{AlbumFormat, AutomationEngine, ExportError, ScriptRegistry};

const CONFIG_DIR: &str = "tracklist";
const CONFIG_FILE: &str = "config.toml";

/// Environment override for the config file location
pub const CONFIG_ENV: &str = "TRACKLIST_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media application to query
    pub app: String,

    /// Directory with `<kind>.applescript` files overriding embedded scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<PathBuf>,

    /// Collate output instead of keeping library order
    pub sort: bool,

    /// Keep surrounding whitespace in values
    pub no_trim: bool,

    /// Use album artist when a track has no artist
    pub fallback: bool,

    pub album_format: AlbumFormat,

    /// Colorize terminal output
    pub color: bool,

    /// How to invoke the automation engine
    pub engine: AutomationEngine,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: DEFAULT_APP.to_string(),
            scripts_dir: None,
            sort: false,
            no_trim: false,
            fallback: false,
            album_format: AlbumFormat::Flat,
            color: true,
            engine: AutomationEngine::default(),
        }
    }
}

impl Config {
    /// Resolve the config file path
    ///
    /// Priority:
    /// 1. explicit path (`--config`)
    /// 2. $TRACKLIST_CONFIG
    /// 3. $XDG_CONFIG_HOME/tracklist/config.toml (or platform equivalent)
    pub fn discover_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration; a missing file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ExportError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ExportError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Self::parse(&contents)
            .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Script registry for the configured application
    pub fn registry(&self) -> Result<ScriptRegistry, ExportError> {
        let registry = ScriptRegistry::for_app(&self.app);
        match &self.scripts_dir {
            Some(dir) => registry.with_overrides_from(dir, &self.app).map_err(|e| {
                ExportError::Config(format!("cannot load scripts from {}: {}", dir.display(), e))
            }),
            None => Ok(registry),
        }
    }
}
