//! Error types for playback coordination

use thiserror::Error;

/// Coordinator errors
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Locator could not be turned into a URL
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// URL parse failure
    #[error("Malformed URL: {0}")]
    Url(#[from] url::ParseError),

    /// Playback engine rejected a request
    #[error("Engine error: {0}")]
    Engine(String),

    /// Client-facing host failed to start the queued item
    #[error("Host error: {0}")]
    Host(String),
}

/// Failure reported by a clock director subscriber
///
/// `OwnerGone` is not a real failure: the director treats it as a request to
/// drop the subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectorError {
    /// The object owning the callback no longer exists
    #[error("Subscriber owner no longer exists")]
    OwnerGone,

    /// Any other subscriber failure
    #[error("Subscriber failed: {0}")]
    Subscriber(String),
}

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;
