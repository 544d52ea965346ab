//! Playback coordinator - current-track ownership and queue continuation
//!
//! Owns the notion of "current track": every `play_*` call detaches the
//! previous clock subscriptions, records the new track key and re-attaches.
//! Telemetry carrying any other key is a misfire and is dropped.
//!
//! Also owns the continuation queue: on each buffering-complete signal at most
//! one waiting item is popped and primed on the engine matching its kind.

use crate::{
    director::{lock, ChannelKind, ClockDirector, SubscriptionHandle},
    error::{DirectorError, Result},
    events::{EngineEvent, RemoteCommand},
    locator::{Locator, TrackKey},
    queue::ContinuationQueue,
    traits::{NowPlayingCenter, PlaybackEngine, QueueHost},
    types::{
        CoordinatorConfig, EngineKind, LockScreenInfo, Needle, PlayingStatus, QueuedItem,
        SessionState, TrackDuration,
    },
    url_map::UrlKeyMap,
};
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

/// Cached state of the current track, shared with clock callbacks
#[derive(Debug, Default)]
struct NowPlayingState {
    key: Option<TrackKey>,
    needle: Option<Needle>,
    duration: Option<TrackDuration>,
    status: PlayingStatus,
    media_info: Option<LockScreenInfo>,
    // Status the last transport call asked for, already reflected
    requested: Option<PlayingStatus>,
    // Set by natural end, reset by the next play
    finished: bool,
}

impl NowPlayingState {
    fn reset_for(&mut self, key: Option<TrackKey>) {
        self.key = key;
        self.needle = None;
        self.duration = None;
        self.status = PlayingStatus::Buffering;
        self.requested = None;
        self.finished = false;
    }
}

/// Handles for the three clock channels
#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    duration: SubscriptionHandle,
    needle: SubscriptionHandle,
    playing_status: SubscriptionHandle,
}

/// Run `apply` on the shared state if `key` is still current
///
/// Returns `Ok(None)` for a misfire and `Err(OwnerGone)` once the coordinator
/// has been dropped.
fn accept<T>(
    state: &Weak<Mutex<NowPlayingState>>,
    channel: ChannelKind,
    key: &TrackKey,
    apply: impl FnOnce(&mut NowPlayingState) -> T,
) -> std::result::Result<Option<T>, DirectorError> {
    let state = state.upgrade().ok_or(DirectorError::OwnerGone)?;
    let mut state = lock(&state);

    if state.key.as_ref() != Some(key) {
        debug!(
            channel = %channel,
            expected = %state.key.as_ref().map_or_else(|| "none".to_string(), ToString::to_string),
            payload = %key,
            "misfire"
        );
        return Ok(None);
    }

    Ok(Some(apply(&mut state)))
}

/// Central playback coordination
///
/// - Subscribes to the clock director for the current track only
/// - Filters stale telemetry by track key
/// - Forwards accepted telemetry to the now-playing integration
/// - Transport controls against the active engine
/// - Gapless continuation from the waiting queue
///
/// All methods take `&self`; internal state is behind locks so engines may
/// report from their own threads. Track switches and teardown are serialized
/// on the subscription lock. Locks are never held across collaborator calls.
pub struct PlaybackCoordinator {
    director: Arc<ClockDirector>,
    engine: Arc<dyn PlaybackEngine>,
    now_playing: Arc<dyn NowPlayingCenter>,
    host: Arc<dyn QueueHost>,

    state: Arc<Mutex<NowPlayingState>>,
    subscriptions: Mutex<Option<Subscriptions>>,
    queue: Mutex<ContinuationQueue>,
    url_keys: Mutex<UrlKeyMap>,
}

impl PlaybackCoordinator {
    /// Create a coordinator wired to its director and collaborators
    pub fn new(
        config: CoordinatorConfig,
        director: Arc<ClockDirector>,
        engine: Arc<dyn PlaybackEngine>,
        now_playing: Arc<dyn NowPlayingCenter>,
        host: Arc<dyn QueueHost>,
    ) -> Self {
        Self {
            director,
            engine,
            now_playing,
            host,
            state: Arc::new(Mutex::new(NowPlayingState::default())),
            subscriptions: Mutex::new(None),
            queue: Mutex::new(ContinuationQueue::new()),
            url_keys: Mutex::new(UrlKeyMap::new(config.url_key_capacity)),
        }
    }

    // ===== Starting playback =====

    /// Play a file from local storage
    pub fn play_local(&self, locator: Locator) -> Result<()> {
        self.begin_playback(locator, EngineKind::Disk)
    }

    /// Stream a remote resource
    pub fn play_remote(&self, locator: Locator) -> Result<()> {
        self.begin_playback(locator, EngineKind::Stream)
    }

    /// Make `locator` the current track and start it on the matching engine
    ///
    /// Always routes the session back through `Buffering`.
    pub fn begin_playback(&self, locator: Locator, kind: EngineKind) -> Result<()> {
        let key = {
            // Held for the whole switch so concurrent calls never orphan a handle
            let mut subscriptions = lock(&self.subscriptions);
            self.detach(subscriptions.take());

            let key = lock(&self.url_keys).insert(&locator);
            lock(&self.state).reset_for(Some(key.clone()));
            *subscriptions = Some(self.attach_subscriptions());
            key
        };

        info!(track = %key, locator = %locator, engine = ?kind, "beginning playback");

        match kind {
            EngineKind::Disk => self.engine.start_local(&locator),
            EngineKind::Stream => self.engine.start_remote(&locator),
        }
    }

    fn attach_subscriptions(&self) -> Subscriptions {
        let duration = {
            let state = Arc::downgrade(&self.state);
            let now_playing = Arc::clone(&self.now_playing);
            self.director.attach_to_duration(move |key, duration| {
                let accepted = accept(&state, ChannelKind::Duration, key, |s| {
                    s.duration = Some(duration);
                    s.media_info.clone()
                })?;

                if let Some(media_info) = accepted {
                    now_playing.reflect_duration(duration);
                    // Metadata display may depend on the duration being known
                    now_playing.show_metadata(media_info.as_ref(), duration);
                }
                Ok(())
            })
        };

        let needle = {
            let state = Arc::downgrade(&self.state);
            let now_playing = Arc::clone(&self.now_playing);
            self.director.attach_to_needle(move |key, needle| {
                let accepted = accept(&state, ChannelKind::Needle, key, |s| {
                    s.needle = Some(needle);
                })?;

                if accepted.is_some() {
                    now_playing.reflect_elapsed(needle);
                }
                Ok(())
            })
        };

        let playing_status = {
            let state = Arc::downgrade(&self.state);
            let now_playing = Arc::clone(&self.now_playing);
            self.director.attach_to_playing_status(move |key, status| {
                let changed = accept(&state, ChannelKind::PlayingStatus, key, |s| {
                    let previous = std::mem::replace(&mut s.status, status);
                    let requested = if status == PlayingStatus::Buffering {
                        s.requested
                    } else {
                        s.requested.take()
                    };
                    // An echo of pause()/play() was reflected when requested
                    previous != status && requested != Some(status)
                })?;

                match (changed, status) {
                    (Some(true), PlayingStatus::Playing) => now_playing.reflect_playing(),
                    (Some(true), PlayingStatus::Paused) => now_playing.reflect_paused(),
                    _ => {}
                }
                Ok(())
            })
        };

        Subscriptions {
            duration,
            needle,
            playing_status,
        }
    }

    fn detach(&self, subscriptions: Option<Subscriptions>) {
        let Some(subscriptions) = subscriptions else {
            return;
        };

        self.director.detach_from_duration(subscriptions.duration);
        self.director.detach_from_needle(subscriptions.needle);
        self.director
            .detach_from_playing_status(subscriptions.playing_status);
    }

    /// Tear down the current track
    ///
    /// Detaches all clock subscriptions, forgets key, needle, duration and
    /// metadata, and clears the now-playing surface. Safe to call repeatedly.
    /// The waiting queue is left alone.
    pub fn clear(&self) {
        {
            let mut subscriptions = lock(&self.subscriptions);
            self.detach(subscriptions.take());

            let mut state = lock(&self.state);
            state.reset_for(None);
            state.media_info = None;
        }

        self.now_playing.clear();
        debug!("cleared current track");
    }

    // ===== Transport =====

    /// Pause the active engine
    ///
    /// Reflected on the now-playing surface right away; the engine's matching
    /// status publication is not reflected a second time.
    pub fn pause(&self) -> Result<()> {
        self.request(PlayingStatus::Paused, || self.engine.pause())?;
        self.now_playing.reflect_paused();
        Ok(())
    }

    /// Resume the active engine
    pub fn play(&self) -> Result<()> {
        self.request(PlayingStatus::Playing, || self.engine.play())?;
        self.now_playing.reflect_playing();
        Ok(())
    }

    fn request(&self, status: PlayingStatus, command: impl FnOnce() -> Result<()>) -> Result<()> {
        // Recorded before the call: engines may publish synchronously
        lock(&self.state).requested = Some(status);

        if let Err(err) = command() {
            lock(&self.state).requested = None;
            return Err(err);
        }
        Ok(())
    }

    /// Play when paused, pause when playing, nothing while buffering
    pub fn toggle_play_pause(&self) -> Result<()> {
        let status = lock(&self.state).status;
        match status {
            PlayingStatus::Playing => self.pause(),
            PlayingStatus::Paused => self.play(),
            PlayingStatus::Buffering => {
                debug!("ignoring toggle while buffering");
                Ok(())
            }
        }
    }

    /// Seek the active engine
    pub fn seek(&self, needle: Needle) -> Result<()> {
        self.engine.seek(needle)
    }

    /// Seek forward by the now-playing skip interval
    pub fn skip_forward(&self) -> Result<()> {
        let target = self.current_needle_or_zero() + self.now_playing.skip_forward_interval();
        self.seek(target)
    }

    /// Seek backward by the now-playing skip interval
    pub fn skip_backward(&self) -> Result<()> {
        let target = self.current_needle_or_zero() - self.now_playing.skip_backward_interval();
        self.seek(target)
    }

    fn current_needle_or_zero(&self) -> Needle {
        lock(&self.state).needle.unwrap_or(0.0)
    }

    /// Playback rate changed on the engine
    pub fn handle_rate_changed(&self, rate: f32) {
        self.now_playing.reflect_rate(rate);
    }

    /// Skip intervals were reconfigured
    pub fn handle_skip_intervals_changed(&self) {
        self.now_playing.reflect_skip_intervals();
    }

    /// Store metadata shown alongside the duration on the next duration update
    pub fn set_lock_screen_info(&self, info: Option<LockScreenInfo>) {
        lock(&self.state).media_info = info;
    }

    /// Map a lock-screen remote command onto transport controls
    pub fn handle_remote_command(&self, command: RemoteCommand) -> Result<()> {
        debug!(?command, "remote command");
        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::TogglePlayPause => self.toggle_play_pause(),
            RemoteCommand::SkipForward => self.skip_forward(),
            RemoteCommand::SkipBackward => self.skip_backward(),
            RemoteCommand::Seek { needle } => self.seek(needle),
        }
    }

    // ===== Queue continuation =====

    /// Queue a local file to follow the current item
    pub fn enqueue_local(&self, locator: Locator, id: impl Into<String>) {
        self.enqueue(QueuedItem::disk(locator, id));
    }

    /// Queue a remote stream to follow the current item
    pub fn enqueue_remote(&self, locator: Locator, id: impl Into<String>) {
        self.enqueue(QueuedItem::stream(locator, id));
    }

    fn enqueue(&self, item: QueuedItem) {
        let mut queue = lock(&self.queue);
        debug!(id = item.id(), engine = ?item.engine(), position = queue.len(), "queued");
        queue.push(item);
    }

    /// Drop every waiting item (the current track keeps playing)
    pub fn clear_queue(&self) {
        lock(&self.queue).clear();
    }

    /// Snapshot of waiting items, head first
    pub fn queued_items(&self) -> Vec<QueuedItem> {
        lock(&self.queue).iter().cloned().collect()
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Engine buffered enough of the current item to prime a successor
    ///
    /// Pops at most one item and primes it on the matching engine. Only acts
    /// while the current item is buffering or playing; skipped when the host
    /// already holds a primed item or the queue is empty.
    pub fn on_buffering_complete(&self) -> Result<()> {
        let session = self.session_state();
        if !matches!(session, SessionState::Buffering | SessionState::Playing) {
            debug!(state = ?session, "ignoring buffering-complete, no active item");
            return Ok(());
        }

        if !self.host.is_ready_for_next_item() {
            info!("skipping priming, an item is already queued for playback");
            return Ok(());
        }

        let Some(item) = lock(&self.queue).pop_next() else {
            debug!("no items to prime");
            return Ok(());
        };

        info!(id = item.id(), locator = %item.locator(), engine = ?item.engine(), "priming next item");

        match item.engine() {
            EngineKind::Disk => self.engine.prime_next_local(item.locator()),
            EngineKind::Stream => self.engine.prime_next_remote(item.locator()),
        }
    }

    /// Current item finished; ask the host to promote the primed item
    pub fn on_playback_ended(&self) -> Result<()> {
        lock(&self.state).finished = true;
        debug!("playback ended");
        self.host.start_queued_item()
    }

    /// Pass an engine failure to the host; no retry happens here
    pub fn on_engine_error(&self, message: &str) {
        warn!(error = message, "engine reported an error");
        self.host.engine_failed(message);
    }

    /// Dispatch an engine lifecycle event
    pub fn handle_engine_event(&self, event: EngineEvent) -> Result<()> {
        match event {
            EngineEvent::BufferingComplete => self.on_buffering_complete(),
            EngineEvent::PlaybackEnded => self.on_playback_ended(),
            EngineEvent::Error { message } => {
                self.on_engine_error(&message);
                Ok(())
            }
        }
    }

    // ===== State Queries =====

    pub fn current_key(&self) -> Option<TrackKey> {
        lock(&self.state).key.clone()
    }

    pub fn needle(&self) -> Option<Needle> {
        lock(&self.state).needle
    }

    pub fn duration(&self) -> Option<TrackDuration> {
        lock(&self.state).duration
    }

    /// Last playing status accepted for the current track
    pub fn playing_status(&self) -> PlayingStatus {
        lock(&self.state).status
    }

    /// Whether the current track is audibly playing
    pub fn currently_playing(&self) -> bool {
        self.playing_status() == PlayingStatus::Playing
    }

    pub fn session_state(&self) -> SessionState {
        let state = lock(&self.state);
        if state.key.is_none() || state.finished {
            SessionState::Idle
        } else {
            state.status.into()
        }
    }

    pub fn lock_screen_info(&self) -> Option<LockScreenInfo> {
        lock(&self.state).media_info.clone()
    }

    /// Recover the locator that produced `key`, if still remembered
    pub fn url_for_key(&self, key: &TrackKey) -> Option<Locator> {
        lock(&self.url_keys).get(key)
    }

    /// Whether clock subscriptions are currently attached
    pub fn is_attached(&self) -> bool {
        lock(&self.subscriptions).is_some()
    }
}

impl Drop for PlaybackCoordinator {
    fn drop(&mut self) {
        let subscriptions = lock(&self.subscriptions).take();
        self.detach(subscriptions);
    }
}

impl fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Subscription lock first, matching begin_playback
        let subscriptions = *lock(&self.subscriptions);
        f.debug_struct("PlaybackCoordinator")
            .field("subscriptions", &subscriptions)
            .field("state", &*lock(&self.state))
            .field("queue_len", &lock(&self.queue).len())
            .finish_non_exhaustive()
    }
}
