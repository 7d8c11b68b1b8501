//! Client side of the fan-control backend.
//!
//! The panel only ever needs two calls; everything behind them (sensor reads,
//! PWM writes, what a profile means) belongs to the backend.

pub mod client;
pub mod protocol;

pub use client::SocketBackend;
pub use protocol::Request;

use async_trait::async_trait;
use fan_core::{ApplyResponse, Result, Status};
use std::sync::Arc;

/// The two remote operations the panel drives.
#[async_trait]
pub trait FanBackend: Send + Sync {
    /// Current readings, profile and mode codes.
    async fn get_status(&self) -> Result<Status>;

    /// Ask the backend to switch to `profile`. Any string is forwarded;
    /// deciding whether it names a real profile is the backend's call.
    async fn set_profile(&self, profile: &str) -> Result<ApplyResponse>;
}

#[async_trait]
impl<B: FanBackend + ?Sized> FanBackend for Arc<B> {
    async fn get_status(&self) -> Result<Status> {
        (**self).get_status().await
    }

    async fn set_profile(&self, profile: &str) -> Result<ApplyResponse> {
        (**self).set_profile(profile).await
    }
}
