//! Wayland layer-shell side panel for `fan-panel`.
//!
//! Owns the Iced application loop and wires together all background tasks:
//! - Status poller (readings, profile, mode codes — once per interval)
//! - Config file watcher (live reload on change)
//! - 1-second timer (toast expiry, clock)
//!
//! Profile applies run as one-shot tasks; their follow-up refresh goes through
//! the poller.

use chrono::{Duration as ChronoDuration, Local};
use fan_backend::{FanBackend, SocketBackend};
use fan_config::{default_path, load as load_config, ConfigWatcher, PanelConfig, Side};
use fan_core::{
    event::Message as AppMessage,
    state::{ApplyOutcome, HealthChange, PanelState},
    Metric,
};
use fan_monitor::{spawn_poller, Refresher};
use fan_renderer::SparklineDims;
use fan_theme::Theme;
use fan_widgets::{CurveWidget, ModeWidget, ProfilePicker, ReadingWidget, StatusWidget, ToastWidget};
use futures::channel::mpsc::Sender;
use futures::SinkExt;
use iced::{
    widget::{column, container, scrollable, text},
    Element, Length, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the panel.  Returns when the surface is closed.
pub fn run() -> iced_layershell::Result {
    let config = load_or_default();

    application(Panel::new, Panel::namespace, Panel::update, Panel::view)
        .subscription(Panel::subscription)
        .style(Panel::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some((config.panel.width, 0)), // height=0 + T|B anchor = full-height stretch
                exclusive_zone: 0,
                anchor: side_to_anchor(config.panel.side),
                layer: Layer::Overlay,
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core panel message.
    App(AppMessage),
    /// The poll subscription started; carries its out-of-cycle trigger.
    PollerReady(Refresher),
    /// One-second timer tick — expires toasts.
    Tick,
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Panel {
    state:    PanelState,
    config:   PanelConfig,
    theme:    Theme,
    backend:  Arc<SocketBackend>,
    poller:   Option<Refresher>,
    picker:   ProfilePicker,
    status:   StatusWidget,
    readings: [ReadingWidget; 4],
    mode:     ModeWidget,
    curve:    CurveWidget,
    toasts:   ToastWidget,
}

impl Panel {
    fn new() -> (Self, Task<Message>) {
        let config = load_or_default();

        let panel = Self {
            state:    PanelState::new(config.poll.history, config.panel.default_profile.clone()),
            theme:    Theme::from_config(&config.theme),
            backend:  Arc::new(SocketBackend::from_config(&config.backend)),
            poller:   None,
            picker:   ProfilePicker::new(&config.profiles),
            status:   StatusWidget::new(),
            readings: Metric::ALL.map(ReadingWidget::new),
            mode:     ModeWidget::new(),
            curve:    CurveWidget::new(),
            toasts:   ToastWidget::new(),
            config,
        };

        // The poll subscription fires its first poll immediately, so there is
        // nothing to seed here.
        (panel, Task::none())
    }

    fn namespace() -> String {
        String::from("fan-panel")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.state.tick(Local::now());
                Task::none()
            }
            Message::PollerReady(refresher) => {
                self.poller = Some(refresher);
                Task::none()
            }
            Message::App(msg) => self.handle_app(msg),
            // Layer-shell injected variants are handled by the backend.
            _ => Task::none(),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        match msg {
            AppMessage::Polled(outcome) => {
                match self.state.apply_poll(outcome, Local::now()) {
                    Some(HealthChange::Recovered) => info!("Fan backend is answering"),
                    Some(HealthChange::Lost) => warn!(
                        "Status poll failing: {}",
                        self.state.status_message().unwrap_or_default()
                    ),
                    None => {}
                }
            }
            AppMessage::ProfileSelected(id) => {
                self.state.select_profile(id);
            }
            AppMessage::ApplyRequested => {
                if let Some(profile) = self.state.begin_apply() {
                    info!("Applying fan profile '{}'", self.config.profile_label(&profile));
                    return apply_task(self.backend.clone(), profile);
                }
            }
            AppMessage::ProfileApplied { profile, outcome } => {
                match &outcome {
                    ApplyOutcome::Applied => info!("Fan profile '{profile}' applied"),
                    ApplyOutcome::Rejected(reason) => {
                        warn!("Applying fan profile '{profile}' failed: {reason}");
                    }
                }
                let ttl = ChronoDuration::seconds(i64::from(self.config.panel.toast_secs));
                if self.state.finish_apply(&profile, outcome, Local::now(), ttl) {
                    self.refresh();
                }
            }
            AppMessage::ConfigReloaded => match load_config(default_path()) {
                Ok(cfg) => {
                    for key in restart_required(&self.config, &cfg) {
                        warn!("Config change to '{key}' takes effect after restart");
                    }
                    info!("Config reloaded");
                    self.theme  = Theme::from_config(&cfg.theme);
                    self.picker = ProfilePicker::new(&cfg.profiles);
                    self.config = cfg;
                }
                Err(e) => warn!("Config reload failed: {e}"),
            },
        }
        Task::none()
    }

    /// Ask the poller for one out-of-cycle `get_status`.
    fn refresh(&self) {
        match &self.poller {
            Some(poller) if poller.refresh() => {}
            // Not started yet; its first poll is immediate anyway.
            None => {}
            Some(_) => warn!("Status poller is gone; refresh skipped"),
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let gap  = f32::from(self.theme.gap);
        let dims = SparklineDims::from(&self.config.sparkline);

        let title = text(self.config.panel.title.as_str())
            .size(self.theme.font_size + 4.0)
            .color(self.theme.accent.to_iced());

        let mut content = column![
            title,
            self.picker.view(&self.state, &self.theme).map(Message::App),
            self.status.view(&self.state, &self.theme).map(Message::App),
        ]
        .spacing(gap)
        .width(Length::Fill);

        // Readings are only meaningful while the backend answers.
        if self.state.status.ok {
            for reading in &self.readings {
                content = content.push(reading.view(&self.state, &self.theme, dims).map(Message::App));
            }
            content = content.push(self.mode.view(&self.state, &self.theme).map(Message::App));
            if let Some(curve) = self.curve.view(&self.state, &self.theme) {
                content = content.push(curve.map(Message::App));
            }
        }

        if let Some(toasts) = self.toasts.view(&self.state, &self.theme) {
            content = content.push(toasts.map(Message::App));
        }

        container(scrollable(content))
            .padding(self.theme.padding)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let tick = iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick);

        Subscription::batch([
            tick,
            Subscription::run(poll_stream),
            Subscription::run(config_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.theme.background.to_iced(),
            text_color: self.theme.foreground.to_iced(),
        }
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

/// Send `set_profile` and report back with `ProfileApplied`.
fn apply_task(backend: Arc<SocketBackend>, profile: String) -> Task<Message> {
    let sent = profile.clone();
    Task::perform(
        async move { ApplyOutcome::from(backend.set_profile(&sent).await) },
        move |outcome| Message::App(AppMessage::ProfileApplied { profile, outcome }),
    )
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.  Iced drops the stream when the
// subscription goes away, which drops everything the stream owns.

/// Polls the backend every `poll.interval_ms` and forwards each outcome.
///
/// The poller handle lives inside the stream future, so tearing down the
/// subscription aborts the poll task with it. The panel only gets a
/// [`Refresher`], which goes dead with the task.
fn poll_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(4, |mut sender: Sender<Message>| async move {
        let config   = load_or_default();
        let backend  = Arc::new(SocketBackend::from_config(&config.backend));
        let interval = Duration::from_millis(config.poll.interval_ms);

        info!(
            "Polling fan backend at {} every {} ms",
            backend.socket().display(),
            config.poll.interval_ms
        );

        let (poller, mut rx) = spawn_poller(backend, interval);
        if sender.send(Message::PollerReady(poller.refresher())).await.is_err() {
            return;
        }

        while let Some(outcome) = rx.recv().await {
            if sender.send(Message::App(AppMessage::Polled(outcome))).await.is_err() {
                return; // panel gone
            }
        }

        // Poll task died; keep the subscription alive without it.
        warn!("Status poller stopped unexpectedly");
        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Watches `~/.config/fan-panel/fan-panel.toml` for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = ConfigWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::App(AppMessage::ConfigReloaded));
        }

        // Watcher could not start; stall rather than end the subscription.
        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_or_default() -> PanelConfig {
    let path = default_path();
    load_config(&path).unwrap_or_else(|e| {
        warn!("{}: {e}; using default configuration", path.display());
        PanelConfig::default()
    })
}

fn side_to_anchor(side: Side) -> Anchor {
    match side {
        Side::Left  => Anchor::Top | Anchor::Bottom | Anchor::Left,
        Side::Right => Anchor::Top | Anchor::Bottom | Anchor::Right,
    }
}

/// Settings that are only read at startup and changed between `old` and `new`.
fn restart_required(old: &PanelConfig, new: &PanelConfig) -> Vec<&'static str> {
    let mut keys = Vec::new();
    if old.backend != new.backend {
        keys.push("backend");
    }
    if old.poll.interval_ms != new.poll.interval_ms {
        keys.push("poll.interval_ms");
    }
    if old.poll.history != new.poll.history {
        keys.push("poll.history");
    }
    if old.panel.side != new.panel.side || old.panel.width != new.panel.width {
        keys.push("panel.side/width");
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_to_the_configured_edge() {
        assert_eq!(side_to_anchor(Side::Right), Anchor::Top | Anchor::Bottom | Anchor::Right);
        assert_eq!(side_to_anchor(Side::Left), Anchor::Top | Anchor::Bottom | Anchor::Left);
    }

    #[test]
    fn live_settings_do_not_need_restart() {
        let old = PanelConfig::default();
        let mut new = old.clone();
        new.theme.accent = "#a6e3a1".into();
        new.sparkline.height = 60.0;
        new.panel.toast_secs = 10;
        assert!(restart_required(&old, &new).is_empty());
    }

    #[test]
    fn startup_settings_are_reported() {
        let old = PanelConfig::default();
        let mut new = old.clone();
        new.poll.interval_ms = 500;
        new.backend.socket = "/tmp/fan.sock".into();
        assert_eq!(restart_required(&old, &new), vec!["backend", "poll.interval_ms"]);
    }
}
