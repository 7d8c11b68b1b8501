//! Status polling loop.
//!
//! One background task per panel session calls `get_status` on a fixed
//! interval and forwards every result, good or bad, as a [`PollOutcome`].
//! Failures are not retried early and never back off: the next tick simply
//! tries again.

use fan_backend::FanBackend;
use fan_core::PollOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Owns a running poll task.
///
/// Dropping the handle (or calling [`PollHandle::stop`]) aborts the task; no
/// `get_status` call starts after that.
#[derive(Debug)]
pub struct PollHandle {
    task:    JoinHandle<()>,
    refresh: Refresher,
}

impl PollHandle {
    /// A cloneable trigger for out-of-cycle polls on this task.
    pub fn refresher(&self) -> Refresher {
        self.refresh.clone()
    }

    /// Cancel polling.
    pub fn stop(self) {
        debug!("status poller stopped");
        // Drop aborts the task.
    }
}

/// Asks the poll task for one poll right now, outside the regular schedule.
#[derive(Debug, Clone)]
pub struct Refresher {
    tx: mpsc::Sender<()>,
}

impl Refresher {
    /// Requests made while one is already queued are merged. Returns `false`
    /// if the poll task is gone.
    pub fn refresh(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a background Tokio task that polls `backend` every `interval` and
/// forwards [`PollOutcome`]s through the returned channel.
///
/// The first poll happens immediately. The task stops when the handle is
/// dropped or when the receiver is dropped.
pub fn spawn_poller<B>(backend: Arc<B>, interval: Duration) -> (PollHandle, mpsc::Receiver<PollOutcome>)
where
    B: FanBackend + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel(4);
    let (refresh_tx, refresh_rx) = mpsc::channel(1);

    let task = tokio::spawn(poll_loop(backend, interval, tx, refresh_rx));

    (
        PollHandle {
            task,
            refresh: Refresher { tx: refresh_tx },
        },
        rx,
    )
}

async fn poll_loop<B>(
    backend: Arc<B>,
    interval: Duration,
    tx: mpsc::Sender<PollOutcome>,
    mut refresh: mpsc::Receiver<()>,
) where
    B: FanBackend + ?Sized,
{
    let mut ticker = time::interval(interval);
    // A slow backend delays the schedule instead of causing a burst of polls.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Some(()) = refresh.recv() => debug!("out-of-cycle status refresh"),
        }

        let outcome = poll_once(backend.as_ref()).await;

        if tx.send(outcome).await.is_err() {
            break; // all receivers dropped
        }
    }
}

/// Run a single `get_status` call and classify the result.
pub async fn poll_once<B>(backend: &B) -> PollOutcome
where
    B: FanBackend + ?Sized,
{
    match backend.get_status().await {
        Ok(status) => status.into_outcome(),
        Err(e) => {
            debug!("status poll failed: {e}");
            PollOutcome::Failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fan_core::{ApplyResponse, PanelError, Result, Status};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const TICK: Duration = Duration::from_secs(1);

    /// Counts calls; answers with the call number as the CPU temperature.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        reply: Option<&'static str>,
    }

    impl Counting {
        fn failing(reply: &'static str) -> Self {
            Self { calls: AtomicUsize::new(0), reply: Some(reply) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FanBackend for Counting {
        async fn get_status(&self) -> Result<Status> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.reply {
                Some(reason) => Err(PanelError::Backend(reason.to_string())),
                None => Ok(Status {
                    ok: true,
                    cpu_temp_c: Some(n as f64),
                    ..Status::default()
                }),
            }
        }

        async fn set_profile(&self, _profile: &str) -> Result<ApplyResponse> {
            Ok(ApplyResponse::accepted())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_poll_is_immediate_then_every_interval() {
        let backend = Arc::new(Counting::default());
        let start = Instant::now();
        let (_handle, mut rx) = spawn_poller(backend.clone(), TICK);

        assert!(matches!(rx.recv().await, Some(PollOutcome::Success(_))));
        assert!(start.elapsed() < TICK);

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= 2 * TICK && elapsed < 3 * TICK, "{elapsed:?}");
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_polls_before_the_next_tick() {
        let backend = Arc::new(Counting::default());
        let (handle, mut rx) = spawn_poller(backend.clone(), TICK);
        rx.recv().await.unwrap();
        let after_first = Instant::now();

        assert!(handle.refresher().refresh());
        let outcome = rx.recv().await.unwrap();

        assert!(after_first.elapsed() < TICK);
        assert_eq!(backend.calls(), 2);
        match outcome {
            PollOutcome::Success(status) => assert_eq!(status.cpu_temp_c, Some(2.0)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_mid_interval_prevents_further_polls() {
        let backend = Arc::new(Counting::default());
        let (handle, mut rx) = spawn_poller(backend.clone(), TICK);
        rx.recv().await.unwrap();

        time::sleep(TICK / 2).await;
        handle.stop();
        time::sleep(5 * TICK).await;

        assert_eq!(backend.calls(), 1);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresher_outlives_handle_but_not_task() {
        let backend = Arc::new(Counting::default());
        let (handle, mut rx) = spawn_poller(backend.clone(), TICK);
        let refresher = handle.refresher();
        rx.recv().await.unwrap();

        drop(handle);
        time::sleep(TICK).await;

        assert!(!refresher.refresh());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_receiver_ends_the_task() {
        let backend = Arc::new(Counting::default());
        let (handle, rx) = spawn_poller(backend.clone(), TICK);
        let refresher = handle.refresher();
        drop(rx);

        time::sleep(3 * TICK).await;

        assert!(!refresher.refresh());
        assert!(backend.calls() <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_keep_polling() {
        let backend = Arc::new(Counting::failing("sensor bus down"));
        let (_handle, mut rx) = spawn_poller(backend.clone(), TICK);

        for _ in 0..3 {
            assert_eq!(
                rx.recv().await,
                Some(PollOutcome::Failure("backend error: sensor bus down".into()))
            );
        }
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn not_ok_status_is_a_failure() {
        struct Rejecting;

        #[async_trait]
        impl FanBackend for Rejecting {
            async fn get_status(&self) -> Result<Status> {
                Ok(Status::failed("sensor timeout"))
            }

            async fn set_profile(&self, _profile: &str) -> Result<ApplyResponse> {
                Ok(ApplyResponse::rejected("read-only"))
            }
        }

        assert_eq!(poll_once(&Rejecting).await, PollOutcome::Failure("sensor timeout".into()));
    }
}
