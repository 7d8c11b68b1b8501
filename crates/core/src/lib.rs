pub mod error;
pub mod event;
pub mod history;
pub mod state;
pub mod status;

pub use error::{PanelError, Result};
pub use event::Message;
pub use history::RollingBuffer;
pub use state::{ApplyOutcome, PanelState};
pub use status::{ApplyResponse, Metric, PollOutcome, Status};
