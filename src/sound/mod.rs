//! Sound feedback for timer events.
//!
//! Each lifecycle event maps to a short cue:
//!
//! ```text
//! TimerEvent ──▶ SoundCue ──▶ SoundWorker (thread) ──▶ SoundPlayer
//!                                   ▲                      │
//!                         crossbeam channel         rodio / mock
//! ```
//!
//! Audio is optional: without an output device the worker discards cues and
//! the timer keeps running.

mod error;
mod player;
mod worker;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::TimerEvent;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use worker::SoundWorker;

/// Playback volume used unless configured otherwise.
pub const DEFAULT_VOLUME: f32 = 0.5;

// ============================================================================
// SoundCue
// ============================================================================

/// Audible feedback kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Start,
    Pause,
    Reset,
    Skip,
    Complete,
}

impl SoundCue {
    /// Every cue, in declaration order.
    pub const ALL: [SoundCue; 5] = [
        SoundCue::Start,
        SoundCue::Pause,
        SoundCue::Reset,
        SoundCue::Skip,
        SoundCue::Complete,
    ];

    /// Returns the cue for an engine event, if it has one.
    pub fn from_event(event: &TimerEvent) -> Option<Self> {
        match event {
            TimerEvent::SessionStarted { .. } => Some(SoundCue::Start),
            TimerEvent::SessionPaused { .. } => Some(SoundCue::Pause),
            TimerEvent::SessionReset { .. } => Some(SoundCue::Reset),
            TimerEvent::SessionSkipped { .. } => Some(SoundCue::Skip),
            TimerEvent::SessionCompleted { .. } => Some(SoundCue::Complete),
            TimerEvent::FocusSessionCompleted { .. } | TimerEvent::SettingsChanged { .. } => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Start => "start",
            SoundCue::Pause => "pause",
            SoundCue::Reset => "reset",
            SoundCue::Skip => "skip",
            SoundCue::Complete => "complete",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SoundPlayer
// ============================================================================

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays `cue` without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: SoundCue) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables sound playback.
    fn enable(&self);

    /// Disables sound playback.
    fn disable(&self);
}

/// Mock sound player for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSoundPlayer {
    played: Arc<Mutex<Vec<SoundCue>>>,
    disabled: Arc<AtomicBool>,
    should_fail: Arc<AtomicBool>,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    /// Returns the cues played so far, oldest first.
    #[must_use]
    pub fn played(&self) -> Vec<SoundCue> {
        self.played.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.played.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.played.lock().unwrap().push(cue);
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}
