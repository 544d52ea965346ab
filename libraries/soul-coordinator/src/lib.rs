//! Soul Player - Playback Coordination
//!
//! Glue between playback engines and everything that watches them.
//!
//! This crate provides:
//! - Clock director: keyed broadcast of duration, needle and playing status
//! - Stale-update filtering by track key (misfires are dropped)
//! - Now-playing / lock-screen forwarding
//! - Transport controls (play, pause, toggle, seek, skip)
//! - Gapless continuation queue across disk and streaming engines
//!
//! # Architecture
//!
//! ```text
//! engine ──publish(key, value)──▶ ClockDirector ──▶ PlaybackCoordinator ──▶ NowPlayingCenter
//! engine ──EngineEvent──────────────────────────▶ PlaybackCoordinator ──▶ PlaybackEngine / QueueHost
//! ```
//!
//! `soul-coordinator` does not decode audio or talk to the OS. Engines, the
//! now-playing surface and the client-facing host are supplied via traits.
//! The director is constructed explicitly and shared with `Arc`, so several
//! players can run side by side.
//!
//! # Example
//!
//! ```rust
//! use soul_coordinator::{
//!     ClockDirector, CoordinatorConfig, LockScreenInfo, Locator, Needle, NowPlayingCenter,
//!     PlaybackCoordinator, PlaybackEngine, PlayingStatus, QueueHost, Result, TrackDuration,
//! };
//! use std::sync::Arc;
//!
//! struct Engine;
//!
//! impl PlaybackEngine for Engine {
//!     fn start_local(&self, _: &Locator) -> Result<()> { Ok(()) }
//!     fn start_remote(&self, _: &Locator) -> Result<()> { Ok(()) }
//!     fn prime_next_local(&self, _: &Locator) -> Result<()> { Ok(()) }
//!     fn prime_next_remote(&self, _: &Locator) -> Result<()> { Ok(()) }
//!     fn pause(&self) -> Result<()> { Ok(()) }
//!     fn play(&self) -> Result<()> { Ok(()) }
//!     fn seek(&self, _: Needle) -> Result<()> { Ok(()) }
//! }
//!
//! struct LockScreen;
//!
//! impl NowPlayingCenter for LockScreen {
//!     fn show_metadata(&self, _: Option<&LockScreenInfo>, _: TrackDuration) {}
//!     fn clear(&self) {}
//!     fn reflect_elapsed(&self, _: Needle) {}
//!     fn reflect_duration(&self, _: TrackDuration) {}
//!     fn reflect_playing(&self) {}
//!     fn reflect_paused(&self) {}
//! }
//!
//! struct Host;
//!
//! impl QueueHost for Host {
//!     fn is_ready_for_next_item(&self) -> bool { true }
//!     fn start_queued_item(&self) -> Result<()> { Ok(()) }
//!     fn engine_failed(&self, _: &str) {}
//! }
//!
//! let director = Arc::new(ClockDirector::new());
//! let coordinator = PlaybackCoordinator::new(
//!     CoordinatorConfig::default(),
//!     Arc::clone(&director),
//!     Arc::new(Engine),
//!     Arc::new(LockScreen),
//!     Arc::new(Host),
//! );
//!
//! let track = Locator::parse("https://cdn.example.com/track.mp3")?;
//! coordinator.play_remote(track.clone())?;
//!
//! // Engine side
//! director.publish_playing_status(&track.key(), PlayingStatus::Playing);
//! director.publish_needle(&track.key(), 12.5);
//!
//! assert!(coordinator.currently_playing());
//! assert_eq!(coordinator.needle(), Some(12.5));
//! # Ok::<(), soul_coordinator::CoordinatorError>(())
//! ```

mod coordinator;
mod director;
mod error;
mod events;
mod locator;
mod queue;
mod traits;
pub mod types;
mod url_map;

// Public exports
pub use coordinator::PlaybackCoordinator;
pub use director::{ChannelKind, ClockDirector, SubscriptionHandle};
pub use error::{CoordinatorError, DirectorError, Result};
pub use events::{EngineEvent, RemoteCommand};
pub use locator::{Locator, TrackKey};
pub use queue::ContinuationQueue;
pub use traits::{NowPlayingCenter, PlaybackEngine, QueueHost};
pub use types::{
    CoordinatorConfig, EngineKind, LockScreenInfo, Needle, PlayingStatus, QueuedItem,
    SessionState, TrackDuration, DEFAULT_SKIP_INTERVAL,
};
pub use url_map::UrlKeyMap;
