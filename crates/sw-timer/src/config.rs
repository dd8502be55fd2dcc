//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Stopwatch configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name given to stopwatches built with [`crate::Stopwatch::from_config`].
    pub default_name: String,
    /// Forward every recorded event to `tracing`.
    pub trace_events: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("default_name", &self.default_name)
            .field("trace_events", &self.trace_events)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_name: "stopwatch".to_string(),
            trace_events: false,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::load_layers(dirs_config_path().as_deref(), config_path)
    }

    /// Merges defaults, `<config_dir>/config.toml`, `config_path` and `SW_*`
    /// environment variables, later layers winning.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    fn load_layers(
        config_dir: Option<&Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = config_dir {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // SW_DEFAULT_NAME, SW_TRACE_EVENTS
        figment = figment.merge(Env::prefixed("SW_"));

        let config: Self = figment.extract()?;
        tracing::debug!(?config, "loaded stopwatch configuration");
        Ok(config)
    }
}

/// Returns the platform-specific config directory for the stopwatch.
///
/// On Linux: `~/.config/stopwatch`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stopwatch"))
}
