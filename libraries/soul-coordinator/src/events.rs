//! Coordinator inputs
//!
//! - [`EngineEvent`]: lifecycle signals emitted by the active engine
//! - [`RemoteCommand`]: transport requests coming from lock-screen controls

use crate::types::Needle;
use serde::{Deserialize, Serialize};

/// Lifecycle events emitted by a playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Enough of the current item is buffered to prime a successor
    BufferingComplete,

    /// The current item's audio finished
    PlaybackEnded,

    /// Engine failure (passed through to the host, never retried here)
    Error {
        /// Error message
        message: String,
    },
}

/// Remote transport commands (lock screen, headset buttons, media keys)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
    SkipForward,
    SkipBackward,
    /// Seek to an absolute needle
    Seek {
        /// Target position in seconds
        needle: Needle,
    },
}
