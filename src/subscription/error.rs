//! Backend error types
//!
//! Failures reported by a [`super::FeedBackend`] when a command cannot be
//! dispatched. They are logged and retried by the next reconciliation; they
//! never reach placement.

/// Error type for feed backend dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Command queue is full
    ChannelFull,
    /// Receiving side has gone away
    ChannelClosed,
    /// Backend refused the command
    Rejected(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::ChannelFull => write!(f, "Feed command channel full"),
            BackendError::ChannelClosed => write!(f, "Feed command channel closed"),
            BackendError::Rejected(reason) => write!(f, "Feed command rejected: {}", reason),
        }
    }
}

impl std::error::Error for BackendError {}
