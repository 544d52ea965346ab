//! Clock director - keyed broadcast hub for playback telemetry
//!
//! Engines publish `(TrackKey, value)` pairs on three independent channels:
//! - duration (total track length)
//! - needle (elapsed position)
//! - playing status (buffering / playing / paused)
//!
//! Subscribers attach a callback per channel and get back a
//! [`SubscriptionHandle`]. The director has no notion of a "current" track;
//! subscribers compare the key themselves and drop misfires.
//!
//! Delivery rules:
//! - Within one channel, callbacks run in attach order.
//! - A callback returning [`DirectorError::OwnerGone`] is detached.
//! - Any other callback error is logged and does not stop delivery.
//! - Callbacks run after the subscriber table lock is released, so they may
//!   attach or detach re-entrantly.

use crate::error::DirectorError;
use crate::locator::TrackKey;
use crate::types::{Needle, PlayingStatus, TrackDuration};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Token identifying one attached callback
///
/// Issued from a single counter shared by all channels, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The three telemetry channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Duration,
    Needle,
    PlayingStatus,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Duration => "duration",
            ChannelKind::Needle => "needle",
            ChannelKind::PlayingStatus => "playing-status",
        };
        f.write_str(name)
    }
}

type Callback<V> = Arc<dyn Fn(&TrackKey, V) -> Result<(), DirectorError> + Send + Sync>;

/// Lock a mutex, recovering the guard if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One subscriber table
struct Channel<V> {
    kind: ChannelKind,
    subscribers: Mutex<BTreeMap<SubscriptionHandle, Callback<V>>>,
}

impl<V: Clone> Channel<V> {
    fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            subscribers: Mutex::new(BTreeMap::new()),
        }
    }

    fn attach(&self, handle: SubscriptionHandle, callback: Callback<V>) {
        lock(&self.subscribers).insert(handle, callback);
        trace!(channel = %self.kind, handle = handle.0, "attached");
    }

    fn detach(&self, handle: SubscriptionHandle) -> bool {
        let removed = lock(&self.subscribers).remove(&handle).is_some();
        if removed {
            trace!(channel = %self.kind, handle = handle.0, "detached");
        }
        removed
    }

    fn publish(&self, key: &TrackKey, value: V) {
        // Handles are monotonic, so map order is attach order
        let snapshot: Vec<(SubscriptionHandle, Callback<V>)> = lock(&self.subscribers)
            .iter()
            .map(|(handle, callback)| (*handle, Arc::clone(callback)))
            .collect();

        let mut dead = Vec::new();
        for (handle, callback) in snapshot {
            match callback(key, value.clone()) {
                Ok(()) => {}
                Err(DirectorError::OwnerGone) => {
                    debug!(
                        channel = %self.kind,
                        handle = handle.0,
                        "subscriber owner gone, detaching"
                    );
                    dead.push(handle);
                }
                Err(err) => {
                    warn!(
                        channel = %self.kind,
                        handle = handle.0,
                        error = %err,
                        "subscriber failed"
                    );
                }
            }
        }

        if !dead.is_empty() {
            let mut subscribers = lock(&self.subscribers);
            for handle in dead {
                subscribers.remove(&handle);
            }
        }
    }

    fn len(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

/// Broadcast hub for duration, needle and playing-status telemetry
///
/// Construct one per player and share it with `Arc` between the engines that
/// publish and the coordinators that subscribe.
pub struct ClockDirector {
    next_handle: AtomicU64,
    duration: Channel<TrackDuration>,
    needle: Channel<Needle>,
    playing_status: Channel<PlayingStatus>,
}

impl ClockDirector {
    /// Create a director with no subscribers
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            duration: Channel::new(ChannelKind::Duration),
            needle: Channel::new(ChannelKind::Needle),
            playing_status: Channel::new(ChannelKind::PlayingStatus),
        }
    }

    fn issue_handle(&self) -> SubscriptionHandle {
        SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    // ===== Duration =====

    /// Attach to duration changes
    pub fn attach_to_duration<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&TrackKey, TrackDuration) -> Result<(), DirectorError> + Send + Sync + 'static,
    {
        let handle = self.issue_handle();
        self.duration.attach(handle, Arc::new(callback));
        handle
    }

    /// Detach from duration changes (no-op for unknown handles)
    pub fn detach_from_duration(&self, handle: SubscriptionHandle) {
        self.duration.detach(handle);
    }

    /// Publish a new duration for `key`
    pub fn publish_duration(&self, key: &TrackKey, duration: TrackDuration) {
        self.duration.publish(key, duration);
    }

    // ===== Needle =====

    /// Attach to needle changes
    pub fn attach_to_needle<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&TrackKey, Needle) -> Result<(), DirectorError> + Send + Sync + 'static,
    {
        let handle = self.issue_handle();
        self.needle.attach(handle, Arc::new(callback));
        handle
    }

    /// Detach from needle changes (no-op for unknown handles)
    pub fn detach_from_needle(&self, handle: SubscriptionHandle) {
        self.needle.detach(handle);
    }

    /// Publish a new needle for `key`
    pub fn publish_needle(&self, key: &TrackKey, needle: Needle) {
        self.needle.publish(key, needle);
    }

    // ===== Playing status =====

    /// Attach to playing-status changes
    pub fn attach_to_playing_status<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&TrackKey, PlayingStatus) -> Result<(), DirectorError> + Send + Sync + 'static,
    {
        let handle = self.issue_handle();
        self.playing_status.attach(handle, Arc::new(callback));
        handle
    }

    /// Detach from playing-status changes (no-op for unknown handles)
    pub fn detach_from_playing_status(&self, handle: SubscriptionHandle) {
        self.playing_status.detach(handle);
    }

    /// Publish a new playing status for `key`
    pub fn publish_playing_status(&self, key: &TrackKey, status: PlayingStatus) {
        self.playing_status.publish(key, status);
    }

    /// Number of callbacks currently attached to a channel
    pub fn subscriber_count(&self, channel: ChannelKind) -> usize {
        match channel {
            ChannelKind::Duration => self.duration.len(),
            ChannelKind::Needle => self.needle.len(),
            ChannelKind::PlayingStatus => self.playing_status.len(),
        }
    }
}

impl Default for ClockDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClockDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockDirector")
            .field("duration_subscribers", &self.duration.len())
            .field("needle_subscribers", &self.needle.len())
            .field("playing_status_subscribers", &self.playing_status.len())
            .finish()
    }
}
