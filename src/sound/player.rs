//! Sound player implementation using rodio.
//!
//! Cues are synthesized as short sine-wave phrases, so no audio assets ship
//! with the binary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::{SoundCue, SoundPlayer, DEFAULT_VOLUME};

/// One note of a cue: frequency in Hz and length in milliseconds.
type Note = (f32, u64);

/// Returns the phrase played for `cue`.
pub(crate) fn notes(cue: SoundCue) -> &'static [Note] {
    match cue {
        SoundCue::Start => &[(660.0, 90), (880.0, 120)],
        SoundCue::Pause => &[(880.0, 90), (660.0, 120)],
        SoundCue::Reset => &[(520.0, 160)],
        SoundCue::Skip => &[(740.0, 70), (740.0, 70)],
        SoundCue::Complete => &[(523.25, 150), (659.25, 150), (783.99, 300)],
    }
}

/// A sound player that uses rodio for audio playback.
///
/// The output stream is not `Send` on every platform; create and use the
/// player on a single thread (see `SoundWorker`).
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Playback volume in `[0.0, 1.0]`.
    volume: Mutex<f32>,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            volume: Mutex::new(DEFAULT_VOLUME),
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Sets the playback volume, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_volume(self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn set_volume(&self, volume: f32) {
        if let Ok(mut current) = self.volume.lock() {
            *current = volume.clamp(0.0, 1.0);
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume.lock().map(|v| *v).unwrap_or(DEFAULT_VOLUME)
    }

    fn play_notes(&self, notes: &[Note]) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.set_volume(self.volume());

        for &(freq, millis) in notes {
            let duration = Duration::from_millis(millis);
            sink.append(
                SineWave::new(freq)
                    .take_duration(duration)
                    .fade_in(Duration::from_millis(5))
                    .amplify(0.4),
            );
        }
        sink.detach();

        debug!(notes = notes.len(), "cue playback started (detached)");
        Ok(())
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!(cue = %cue, "sound playback disabled, skipping");
            return Ok(());
        }
        debug!(cue = %cue, "playing cue");
        self.play_notes(notes(cue))
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
        debug!("sound playback enabled");
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
        debug!("sound playback disabled");
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("volume", &self.volume())
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player(volume: f32) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(false) {
        Ok(player) => Some(player.with_volume(volume)),
        Err(e) => {
            warn!(error = %e, "audio not available, sound disabled");
            None
        }
    }
}
