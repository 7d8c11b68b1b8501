use fan_core::{event::Message, state::PanelState};
use fan_theme::Theme;
use iced::{
    widget::{column, row, text},
    Alignment, Element, Length,
};

/// The status/error field and the "last updated" line.
///
/// Shows the error (or "Not ready") while polls are failing, and only the
/// timestamp while they succeed.
#[derive(Debug, Default)]
pub struct StatusWidget;

impl StatusWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a PanelState, theme: &'a Theme) -> Element<'a, Message> {
        let updated = text(last_updated(state))
            .size(theme.small_size())
            .color(theme.foreground.with_alpha(0.6).to_iced());

        match state.status_message() {
            Some(msg) => {
                let field = row![
                    text("Status").size(theme.small_size()).width(Length::Fill),
                    text(msg).size(theme.font_size).color(theme.error.to_iced()),
                ]
                .align_y(Alignment::Center);
                column![field, updated].spacing(2.0).into()
            }
            None => updated.into(),
        }
    }
}

fn last_updated(state: &PanelState) -> String {
    match state.last_update {
        Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
        None => "No data yet".to_string(),
    }
}
