use fan_core::{
    event::Message,
    state::{PanelState, Toast, ToastKind},
};
use fan_theme::Theme;
use iced::{
    widget::{column, container, text, Column},
    Border, Element, Length,
};

/// Transient notifications, newest at the bottom.
#[derive(Debug, Default)]
pub struct ToastWidget;

impl ToastWidget {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when there is nothing to show.
    pub fn view<'a>(
        &'a self,
        state: &'a PanelState,
        theme: &'a Theme,
    ) -> Option<Element<'a, Message>> {
        if state.toasts.is_empty() {
            return None;
        }
        let cards: Vec<Element<'a, Message>> =
            state.toasts.iter().map(|t| card(t, theme)).collect();
        Some(Column::with_children(cards).spacing(4.0).into())
    }
}

fn card<'a>(toast: &'a Toast, theme: &'a Theme) -> Element<'a, Message> {
    let edge = match toast.kind {
        ToastKind::Info  => theme.accent,
        ToastKind::Error => theme.error,
    };
    let fill = theme.foreground.with_alpha(0.08).to_iced();

    container(column![
        text(toast.title.as_str()).size(theme.font_size).color(edge.to_iced()),
        text(toast.body.as_str()).size(theme.small_size()),
    ])
    .padding(8)
    .width(Length::Fill)
    .style(move |_: &iced::Theme| container::Style {
        background: Some(fill.into()),
        border: Border {
            color: edge.to_iced(),
            width: 1.0,
            radius: 6.0.into(),
        },
        ..container::Style::default()
    })
    .into()
}
