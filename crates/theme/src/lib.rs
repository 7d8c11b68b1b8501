pub mod colors;

pub use colors::Color;

use fan_config::ThemeConfig;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible — invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Sparkline stroke and highlights.
    pub accent:     Color,
    /// Error text and failure toasts.
    pub error:      Color,
    pub font_size:  f32,
    pub padding:    u16,
    pub gap:        u16,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            background: Color::from_hex(&cfg.background).unwrap_or(Color::DARK),
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE),
            accent:     Color::from_hex(&cfg.accent).unwrap_or(Color::PURPLE),
            error:      Color::from_hex(&cfg.error).unwrap_or(Color::RED),
            font_size:  cfg.font_size,
            padding:    cfg.padding,
            gap:        cfg.gap,
        }
    }

    /// Text size for secondary lines (labels, toasts, timestamps).
    pub fn small_size(&self) -> f32 {
        (self.font_size - 2.0).max(8.0)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
