use fan_core::{event::Message, state::PanelState, Status};
use fan_theme::Theme;
use iced::{
    widget::{row, text},
    Alignment, Element, Length,
};

/// Raw fan mode codes exactly as the backend reports them.
///
/// The numbers are hardware-specific; the panel does not interpret them.
#[derive(Debug, Default)]
pub struct ModeWidget;

impl ModeWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a PanelState, theme: &'a Theme) -> Element<'a, Message> {
        row![
            text("Curve Mode").size(theme.small_size()).width(Length::Fill),
            text(format_modes(&state.status)).size(theme.small_size()),
        ]
        .align_y(Alignment::Center)
        .into()
    }
}

fn format_modes(status: &Status) -> String {
    let code = |v: Option<i64>| v.map_or_else(|| "n/a".to_string(), |v| v.to_string());
    format!(
        "pwm1_enable={} / pwm2_enable={}",
        code(status.pwm1_enable),
        code(status.pwm2_enable)
    )
}
