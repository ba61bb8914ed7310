//! Background thread that owns the sound player.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, warn};

use crate::engine::TimerEvent;

use super::error::SoundError;
use super::player::try_create_player;
use super::{SoundCue, SoundPlayer};

/// Plays cues on a dedicated thread.
///
/// The player is built on the worker thread by the factory passed to
/// `spawn`, so players that are not `Send` (rodio's output stream) can be
/// driven from async code. A factory returning `None` makes the worker
/// silently discard cues.
#[derive(Debug)]
pub struct SoundWorker {
    tx: Option<Sender<SoundCue>>,
    handle: Option<JoinHandle<()>>,
}

impl SoundWorker {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<F, P>(factory: F) -> Result<Self, SoundError>
    where
        F: FnOnce() -> Option<P> + Send + 'static,
        P: SoundPlayer + 'static,
    {
        let (tx, rx) = unbounded::<SoundCue>();

        let handle = thread::Builder::new()
            .name("sound-worker".to_string())
            .spawn(move || {
                let player = factory();
                if player.is_none() {
                    debug!("sound worker running without a player");
                }
                for cue in rx.iter() {
                    let Some(player) = player.as_ref() else {
                        continue;
                    };
                    if let Err(e) = player.play(cue) {
                        warn!(cue = %cue, error = %e, "failed to play cue");
                    }
                }
                debug!("sound worker stopped");
            })
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Spawns a worker backed by the default audio device at `volume`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned. A missing audio
    /// device is only logged.
    pub fn rodio(volume: f32) -> Result<Self, SoundError> {
        Self::spawn(move || try_create_player(volume))
    }

    /// Queues a cue for playback.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::WorkerStopped` if the worker thread has exited.
    pub fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        let tx = self.tx.as_ref().ok_or(SoundError::WorkerStopped)?;
        tx.send(cue).map_err(|_| SoundError::WorkerStopped)
    }

    /// Queues the cue for `event`, if it has one.
    pub fn handle_event(&self, event: &TimerEvent) {
        let Some(cue) = SoundCue::from_event(event) else {
            return;
        };
        if let Err(e) = self.play(cue) {
            debug!(error = %e, "cue dropped");
        }
    }

    /// Stops accepting cues and waits for queued ones to be handed to the
    /// player.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sound worker panicked");
            }
        }
    }
}

impl Drop for SoundWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
