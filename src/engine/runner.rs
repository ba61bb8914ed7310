//! Async driver for the timer engine.
//!
//! `EngineRunner` owns a `TimerEngine` and serializes two inputs onto one
//! task: commands from the command surface and ticks from the engine's own
//! tick signal. After every input it publishes a fresh `Snapshot`.

use std::ops::ControlFlow;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::types::{SettingsUpdate, Snapshot};

use super::error::ValidationError;
use super::timer::TimerEngine;

// ============================================================================
// Command
// ============================================================================

/// Commands accepted by the runner.
#[derive(Debug)]
pub enum Command {
    /// Start counting the current mode
    Start,
    /// Pause the timer
    Pause,
    /// Start if paused, pause if running
    Toggle,
    /// Clear the elapsed time of the current mode
    Reset,
    /// Move on to the next mode
    Skip,
    /// Change settings; the validation result is sent back on `reply`
    UpdateSettings {
        /// Fields to change
        update: SettingsUpdate,
        /// Receives the outcome
        reply: oneshot::Sender<Result<(), ValidationError>>,
    },
    /// Stop the runner and hand the engine back
    Shutdown,
}

impl Command {
    /// Returns the command name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Toggle => "toggle",
            Command::Reset => "reset",
            Command::Skip => "skip",
            Command::UpdateSettings { .. } => "update_settings",
            Command::Shutdown => "shutdown",
        }
    }
}

// ============================================================================
// EngineRunner
// ============================================================================

/// Drives a `TimerEngine` from a command channel and its tick signal.
pub struct EngineRunner {
    /// Engine being driven
    engine: TimerEngine,
    /// Incoming commands
    commands: mpsc::UnboundedReceiver<Command>,
    /// Snapshot publisher for presentation
    snapshot_tx: watch::Sender<Snapshot>,
}

impl EngineRunner {
    /// Creates a runner and the snapshot subscription for presentation.
    pub fn new(
        engine: TimerEngine,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> (Self, watch::Receiver<Snapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        let runner = Self {
            engine,
            commands,
            snapshot_tx,
        };
        (runner, snapshot_rx)
    }

    /// Runs until `Command::Shutdown` arrives or every command sender is
    /// dropped, then pauses the engine and returns it.
    pub async fn run(mut self) -> TimerEngine {
        info!("engine runner started");

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("command channel closed");
                        break;
                    };
                    if self.handle(command).is_break() {
                        break;
                    }
                }
                () = self.engine.next_tick() => {
                    self.engine.tick();
                }
            }

            self.publish();
        }

        self.engine.pause();
        self.publish();
        info!("engine runner stopped");
        self.engine
    }

    /// Applies a single command to the engine.
    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        debug!(command = command.as_str(), "handling command");

        match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Toggle => {
                if self.engine.is_running() {
                    self.engine.pause();
                } else {
                    self.engine.start();
                }
            }
            Command::Reset => self.engine.reset(),
            Command::Skip => self.engine.skip(),
            Command::UpdateSettings { update, reply } => {
                let result = self.engine.update_settings(update);
                if reply.send(result).is_err() {
                    debug!("settings reply receiver dropped");
                }
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    /// Publishes the current snapshot to every subscriber.
    fn publish(&self) {
        self.snapshot_tx.send_replace(self.engine.snapshot());
    }
}

// ============================================================================
// Tests
// ============================================================================
