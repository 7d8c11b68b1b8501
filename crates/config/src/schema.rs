use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `fan-panel.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Where and how to reach the fan-control backend.
    pub backend: BackendConfig,
    /// Poll cadence and history length.
    pub poll: PollConfig,
    /// Sparkline drawing box.
    pub sparkline: SparklineConfig,
    /// Panel surface settings.
    pub panel: SurfaceConfig,
    /// Profiles offered in the drop-down, in display order.
    pub profiles: Vec<ProfileConfig>,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll: PollConfig::default(),
            sparkline: SparklineConfig::default(),
            panel: SurfaceConfig::default(),
            profiles: vec![
                ProfileConfig::new("balanced", "Balanced (stock)"),
                ProfileConfig::new("aggressive", "Aggressive"),
            ],
            theme: ThemeConfig::default(),
        }
    }
}

impl PanelConfig {
    /// Label for profile `id`, falling back to the id itself.
    pub fn profile_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.label.as_str())
            .unwrap_or(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Unix socket the backend listens on.
    pub socket: String,
    /// Upper bound for one call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            socket: "/run/fan-control/fan-control.sock".to_string(),
            timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Time between scheduled `get_status` calls.
    pub interval_ms: u64,
    /// Samples kept per metric.
    pub history: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            history: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklineConfig {
    pub width: f32,
    pub height: f32,
    /// Inset on every side, in logical pixels.
    pub padding: f32,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            width: 260.0,
            height: 40.0,
            padding: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Heading shown at the top of the panel.
    pub title: String,
    /// Screen edge the panel is anchored to.
    pub side: Side,
    /// Panel width in logical pixels.
    pub width: u32,
    /// Profile shown in the picker until the backend reports one.
    pub default_profile: String,
    /// How long notifications stay visible.
    pub toast_secs: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "Fan Control".to_string(),
            side: Side::Right,
            width: 320,
            default_profile: "aggressive".to_string(),
            toast_secs: 4,
        }
    }
}

/// Screen edge for the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// One entry of the profile drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Identifier sent to `set_profile`.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl ProfileConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Panel background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Primary text/foreground color.
    pub foreground: String,
    /// Accent color, used for sparklines.
    pub accent: String,
    /// Color for error text and failure toasts.
    pub error: String,
    /// Font size in points.
    pub font_size: f32,
    /// Outer padding of the panel (pixels).
    pub padding: u16,
    /// Gap between rows (pixels).
    pub gap: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha — base
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha — text
            accent:     "#cba6f7".to_string(), // Catppuccin Mocha — mauve
            error:      "#f38ba8".to_string(), // Catppuccin Mocha — red
            font_size:  14.0,
            padding:    12,
            gap:        8,
        }
    }
}
