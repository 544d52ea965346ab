//! Collaborator seams
//!
//! The coordinator never decodes audio or touches OS media controls. It drives
//! three collaborators through these traits:
//! - [`PlaybackEngine`] - disk and streaming engines behind one facade
//! - [`NowPlayingCenter`] - lock screen / now-playing surface
//! - [`QueueHost`] - client-facing layer that owns queued-item promotion

use crate::error::Result;
use crate::locator::Locator;
use crate::types::{LockScreenInfo, Needle, TrackDuration, DEFAULT_SKIP_INTERVAL};

/// Playback engine facade
///
/// Implementors route `*_local` calls to the disk engine and `*_remote` calls
/// to the streaming engine. Engines report telemetry through the
/// [`ClockDirector`](crate::ClockDirector) and lifecycle events through
/// [`PlaybackCoordinator::handle_engine_event`](crate::PlaybackCoordinator::handle_engine_event).
pub trait PlaybackEngine: Send + Sync {
    /// Start playing a file from local storage
    fn start_local(&self, locator: &Locator) -> Result<()>;

    /// Start streaming a remote resource
    fn start_remote(&self, locator: &Locator) -> Result<()>;

    /// Prepare a local item to follow the current one without a gap
    fn prime_next_local(&self, locator: &Locator) -> Result<()>;

    /// Prepare a remote item to follow the current one without a gap
    fn prime_next_remote(&self, locator: &Locator) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn play(&self) -> Result<()>;

    /// Seek the active item
    ///
    /// The needle is not range-checked by the coordinator.
    fn seek(&self, needle: Needle) -> Result<()>;
}

/// Lock screen / now-playing integration
pub trait NowPlayingCenter: Send + Sync {
    /// Show media metadata together with the known duration
    fn show_metadata(&self, info: Option<&LockScreenInfo>, duration: TrackDuration);

    /// Remove everything from the now-playing surface
    fn clear(&self);

    fn reflect_elapsed(&self, needle: Needle);

    fn reflect_duration(&self, duration: TrackDuration);

    fn reflect_playing(&self);

    fn reflect_paused(&self);

    fn reflect_rate(&self, _speed: f32) {}

    /// Skip intervals changed; refresh the skip buttons
    fn reflect_skip_intervals(&self) {}

    /// Seconds added by "skip forward"
    fn skip_forward_interval(&self) -> f64 {
        DEFAULT_SKIP_INTERVAL
    }

    /// Seconds subtracted by "skip backward"
    fn skip_backward_interval(&self) -> f64 {
        DEFAULT_SKIP_INTERVAL
    }
}

/// Client-facing layer that owns the primed item
pub trait QueueHost: Send + Sync {
    /// Whether a new item may be primed (false while one is already primed)
    fn is_ready_for_next_item(&self) -> bool;

    /// Promote the primed item to now playing
    ///
    /// Implementations normally call back into
    /// [`PlaybackCoordinator::play_local`](crate::PlaybackCoordinator::play_local)
    /// or `play_remote`, which starts a fresh subscription cycle.
    fn start_queued_item(&self) -> Result<()>;

    /// Engine failure passed up unchanged; recovery policy lives here
    fn engine_failed(&self, message: &str);
}
