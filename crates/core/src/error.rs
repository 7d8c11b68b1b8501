use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("config error: {0}")]
    Config(String),

    /// The backend could not be reached or the connection broke mid-call.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend answered with something that isn't a valid reply.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("backend did not answer within {0} ms")]
    Timeout(u64),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = PanelError> = std::result::Result<T, E>;
