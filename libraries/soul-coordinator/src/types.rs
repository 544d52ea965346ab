//! Core types for playback coordination

use crate::locator::Locator;
use serde::{Deserialize, Serialize};

/// Playback position within the current track, in seconds
///
/// Not clamped by the coordinator; skip arithmetic may produce values outside
/// `[0, duration]` and the engine decides what to do with them.
pub type Needle = f64;

/// Total length of the current track, in seconds
pub type TrackDuration = f64;

/// Default skip interval used by now-playing integrations that don't
/// configure their own (seconds)
pub const DEFAULT_SKIP_INTERVAL: f64 = 15.0;

/// Default number of distinct tracks remembered by the url-key map
pub const DEFAULT_URL_KEY_CAPACITY: usize = 256;

/// Playing status as published by an engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayingStatus {
    /// Waiting for enough audio to start (initial value on every attach)
    #[default]
    Buffering,

    /// Audio is audible
    Playing,

    /// Paused mid-track
    Paused,
}

/// Coarse session state derived from the current key and playing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No track, or the current track finished naturally
    Idle,

    /// Track started, engine still buffering
    Buffering,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl From<PlayingStatus> for SessionState {
    fn from(status: PlayingStatus) -> Self {
        match status {
            PlayingStatus::Buffering => SessionState::Buffering,
            PlayingStatus::Playing => SessionState::Playing,
            PlayingStatus::Paused => SessionState::Paused,
        }
    }
}

/// Which engine an item has to be served by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    /// Decoded from local storage
    Disk,

    /// Fetched over the network
    Stream,
}

/// An item waiting in the continuation queue
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedItem {
    locator: Locator,
    id: String,
    engine: EngineKind,
}

impl QueuedItem {
    /// Create a new queued item
    pub fn new(locator: Locator, id: impl Into<String>, engine: EngineKind) -> Self {
        Self {
            locator,
            id: id.into(),
            engine,
        }
    }

    /// Item served from local storage
    pub fn disk(locator: Locator, id: impl Into<String>) -> Self {
        Self::new(locator, id, EngineKind::Disk)
    }

    /// Item streamed from the network
    pub fn stream(locator: Locator, id: impl Into<String>) -> Self {
        Self::new(locator, id, EngineKind::Stream)
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }
}

/// Media metadata shown on the lock screen / now-playing surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockScreenInfo {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Artwork location (optional, URL string)
    pub artwork_url: Option<String>,

    /// Release date as unix seconds (optional)
    pub release_date: Option<i64>,
}

/// Configuration for the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Maximum number of distinct tracks kept in the url-key map
    /// (default: 256, 0 is treated as 1)
    pub url_key_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            url_key_capacity: DEFAULT_URL_KEY_CAPACITY,
        }
    }
}
