pub mod schema;
pub mod watcher;

pub use schema::{
    BackendConfig, PanelConfig, PollConfig, ProfileConfig, Side, SparklineConfig, SurfaceConfig,
    ThemeConfig,
};
pub use watcher::ConfigWatcher;

use fan_core::{PanelError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PanelConfig::default()` if
/// the file doesn't exist so the panel always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PanelConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PanelConfig::default());
    }

    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

/// Parse and sanity-check a config document.
pub fn parse(raw: &str) -> Result<PanelConfig> {
    let cfg: PanelConfig =
        toml::from_str(raw).map_err(|e| PanelError::Config(format!("TOML parse error: {e}")))?;

    if cfg.poll.interval_ms == 0 {
        return Err(PanelError::Config("poll.interval_ms must be greater than 0".into()));
    }
    if cfg.backend.timeout_ms == 0 {
        return Err(PanelError::Config("backend.timeout_ms must be greater than 0".into()));
    }
    if cfg.profiles.is_empty() {
        return Err(PanelError::Config("at least one [[profiles]] entry is required".into()));
    }
    if cfg.sparkline.width <= 2.0 * cfg.sparkline.padding
        || cfg.sparkline.height <= 2.0 * cfg.sparkline.padding
    {
        return Err(PanelError::Config(
            "sparkline width/height must exceed twice the padding".into(),
        ));
    }
    Ok(cfg)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("fan-panel").join("fan-panel.toml")
}
