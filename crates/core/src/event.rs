use crate::state::ApplyOutcome;
use crate::status::PollOutcome;

/// All messages (events) that can flow through the panel's update loop.
///
/// Sources:
/// - Poll subscription      → `Polled`
/// - Apply task             → `ProfileApplied`
/// - Config watcher task    → `ConfigReloaded`
/// - User input             → `ProfileSelected`, `ApplyRequested`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Backend ───────────────────────────────────────────────────────────────
    /// One poll cycle finished (scheduled or out-of-cycle).
    Polled(PollOutcome),
    /// `set_profile` returned for the given profile.
    ProfileApplied { profile: String, outcome: ApplyOutcome },

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,

    // ── User actions ──────────────────────────────────────────────────────────
    /// User picked a profile in the drop-down (carries the profile id).
    ProfileSelected(String),
    /// User pressed "Apply Profile".
    ApplyRequested,
}
