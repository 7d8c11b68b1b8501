use fan_config::ProfileConfig;
use fan_core::{event::Message, state::PanelState};
use fan_theme::Theme;
use iced::{
    widget::{button, column, pick_list, row, text},
    Alignment, Element, Length,
};
use std::fmt;

/// One entry of the profile drop-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChoice {
    pub id:    String,
    pub label: String,
}

impl fmt::Display for ProfileChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<&ProfileConfig> for ProfileChoice {
    fn from(cfg: &ProfileConfig) -> Self {
        Self {
            id:    cfg.id.clone(),
            label: cfg.label.clone(),
        }
    }
}

/// Profile drop-down, apply button and the backend's active profile.
#[derive(Debug, Default)]
pub struct ProfilePicker {
    choices: Vec<ProfileChoice>,
}

impl ProfilePicker {
    pub fn new(profiles: &[ProfileConfig]) -> Self {
        Self {
            choices: profiles.iter().map(ProfileChoice::from).collect(),
        }
    }

    pub fn view<'a>(&'a self, state: &'a PanelState, theme: &'a Theme) -> Element<'a, Message> {
        let selected = &state.profile.selected;
        let choices = self.choices_including(selected);
        let current = choices.iter().find(|c| &c.id == selected).cloned();

        let picker = pick_list(choices, current, |c: ProfileChoice| Message::ProfileSelected(c.id))
            .text_size(theme.font_size)
            .width(Length::Fill);

        let label = if state.applying { "Applying…" } else { "Apply Profile" };
        let apply = button(text(label).size(theme.font_size))
            .on_press_maybe((!state.applying).then_some(Message::ApplyRequested))
            .width(Length::Fill);

        let active = row![
            text("Active").size(theme.small_size()).width(Length::Fill),
            text(self.label_for(state.profile.active.as_deref())).size(theme.small_size()),
        ]
        .align_y(Alignment::Center);

        column![picker, apply, active].spacing(f32::from(theme.gap)).into()
    }

    /// The configured choices, plus `selected` when the backend reported a
    /// profile the config doesn't list.
    fn choices_including(&self, selected: &str) -> Vec<ProfileChoice> {
        let mut choices = self.choices.clone();
        if !choices.iter().any(|c| c.id == selected) {
            choices.push(ProfileChoice {
                id:    selected.to_string(),
                label: selected.to_string(),
            });
        }
        choices
    }

    fn label_for(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return "unknown".to_string();
        };
        self.choices
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| id.to_string(), |c| c.label.clone())
    }
}
