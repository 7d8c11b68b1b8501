use crate::error::PanelError;
use crate::history::RollingBuffer;
use crate::status::{ApplyResponse, Metric, PollOutcome, Status};
use chrono::{DateTime, Duration, Local};

/// Shown in the status field before the first poll completes.
pub const NOT_READY: &str = "Not ready";

/// Central panel state — all widgets read from this snapshot.
#[derive(Debug, Clone)]
pub struct PanelState {
    /// Latest poll result (a failed record after a failed poll).
    pub status: Status,
    /// Picker selection and backend-reported profile.
    pub profile: ProfileSelection,
    /// `true` while a `set_profile` call is in flight.
    pub applying: bool,
    /// Transient notifications, oldest first.
    pub toasts: Vec<Toast>,
    /// When the last successful poll landed.
    pub last_update: Option<DateTime<Local>>,
    /// Current local time (updated every second).
    pub time: DateTime<Local>,
    histories: [RollingBuffer<f64>; 4],
    /// Health after the last poll; `None` until the first one lands.
    healthy: Option<bool>,
}

impl PanelState {
    pub fn new(history_capacity: usize, default_profile: impl Into<String>) -> Self {
        Self {
            status: Status::default(),
            profile: ProfileSelection::new(default_profile),
            applying: false,
            toasts: Vec::new(),
            last_update: None,
            time: Local::now(),
            histories: std::array::from_fn(|_| RollingBuffer::new(history_capacity)),
            healthy: None,
        }
    }

    pub fn history(&self, metric: Metric) -> &RollingBuffer<f64> {
        &self.histories[metric.index()]
    }

    /// Message for the status field, or `None` when the last poll succeeded.
    pub fn status_message(&self) -> Option<&str> {
        if self.status.ok {
            return None;
        }
        Some(self.status.error.as_deref().unwrap_or(NOT_READY))
    }

    /// Fold one poll cycle into the state.
    ///
    /// Failed polls replace the snapshot but never touch the histories.
    pub fn apply_poll(&mut self, outcome: PollOutcome, now: DateTime<Local>) -> Option<HealthChange> {
        match outcome {
            PollOutcome::Success(status) => {
                if let Some(profile) = status.profile.as_deref() {
                    self.profile.observe(profile);
                }
                for metric in Metric::ALL {
                    if let Some(value) = status.reading(metric) {
                        self.histories[metric.index()].push(value);
                    }
                }
                self.status = status;
                self.last_update = Some(now);
            }
            PollOutcome::Failure(message) => {
                self.status = Status::failed(message);
            }
        }

        // The first poll always reports its health.
        match self.healthy.replace(self.status.ok) {
            Some(was_ok) if was_ok == self.status.ok => None,
            _ if self.status.ok => Some(HealthChange::Recovered),
            _ => Some(HealthChange::Lost),
        }
    }

    /// User picked `id` in the drop-down.
    pub fn select_profile(&mut self, id: impl Into<String>) {
        self.profile.select(id);
    }

    /// Mark an apply as started and return the profile to send.
    ///
    /// Returns `None` if an apply is already in flight.
    pub fn begin_apply(&mut self) -> Option<String> {
        if self.applying {
            return None;
        }
        self.applying = true;
        Some(self.profile.selected.clone())
    }

    /// Record the backend's answer to `set_profile(profile)`.
    ///
    /// Returns `true` when the caller should issue an immediate refresh.
    pub fn finish_apply(
        &mut self,
        profile: &str,
        outcome: ApplyOutcome,
        now: DateTime<Local>,
        toast_ttl: Duration,
    ) -> bool {
        self.applying = false;
        match outcome {
            ApplyOutcome::Applied => {
                self.profile.confirm(profile);
                self.toasts.push(Toast {
                    title: "Fan profile applied".to_string(),
                    body: profile.to_uppercase(),
                    kind: ToastKind::Info,
                    expires_at: now + toast_ttl,
                });
                true
            }
            ApplyOutcome::Rejected(reason) => {
                self.toasts.push(Toast {
                    title: "Apply failed".to_string(),
                    body: reason,
                    kind: ToastKind::Error,
                    expires_at: now + toast_ttl,
                });
                false
            }
        }
    }

    /// Advance the clock and drop expired toasts.
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.time = now;
        self.toasts.retain(|t| t.expires_at > now);
    }
}

/// Transition between a healthy and a failing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    Recovered,
    Lost,
}

/// What the picker shows versus what the backend runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelection {
    /// Profile shown in the drop-down.
    pub selected: String,
    /// Profile the backend last reported as applied.
    pub active: Option<String>,
    /// The user changed `selected` and hasn't applied it yet.
    pub pending: bool,
}

impl ProfileSelection {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            selected: default.into(),
            active: None,
            pending: false,
        }
    }

    fn select(&mut self, id: impl Into<String>) {
        self.selected = id.into();
        self.pending = self.active.as_deref() != Some(self.selected.as_str());
    }

    /// Backend reported `profile` as current.
    fn observe(&mut self, profile: &str) {
        self.active = Some(profile.to_string());
        if !self.pending {
            self.selected = profile.to_string();
        } else if self.selected == profile {
            self.pending = false;
        }
    }

    /// Backend accepted `profile`. A different pick made while the call was
    /// in flight stays selected and pending.
    fn confirm(&mut self, profile: &str) {
        self.active = Some(profile.to_string());
        if !self.pending || self.selected == profile {
            self.selected = profile.to_string();
            self.pending = false;
        }
    }
}

/// Result of a `set_profile` call, reduced to what the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Rejected(String),
}

/// Body of a failure toast when the backend gives no reason.
pub const UNKNOWN_ERROR: &str = "Unknown error";

impl From<Result<ApplyResponse, PanelError>> for ApplyOutcome {
    fn from(result: Result<ApplyResponse, PanelError>) -> Self {
        match result {
            Ok(res) if res.ok => ApplyOutcome::Applied,
            Ok(res) => ApplyOutcome::Rejected(
                res.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
            Err(e) => ApplyOutcome::Rejected(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
    pub expires_at: DateTime<Local>,
}
