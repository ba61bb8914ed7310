//! Timer engine for the Pomodoro timer.
//!
//! This module provides the core state machine:
//! - Mode transitions (Focus → ShortBreak/LongBreak → Focus)
//! - Cycle counting with a long break every `cycles` focus sessions
//! - Elapsed-time tracking driven by an owned tick signal
//! - Lifecycle events for sound, task and notification collaborators

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::SettingsStore;
use crate::types::{EngineState, Mode, Settings, SettingsUpdate, Snapshot};

use super::error::ValidationError;
use super::ticks::TickSource;

// ============================================================================
// TimerEvent
// ============================================================================

/// Lifecycle events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The timer started (or resumed) counting `mode`
    SessionStarted {
        /// Mode being counted
        mode: Mode,
    },
    /// The timer was paused
    SessionPaused {
        /// Mode that was paused
        mode: Mode,
    },
    /// Elapsed time of the current mode was cleared
    SessionReset {
        /// Mode that was reset
        mode: Mode,
    },
    /// The current mode was abandoned in favour of the next one
    SessionSkipped {
        /// Mode that was skipped
        mode: Mode,
        /// Mode now active
        next: Mode,
    },
    /// The current mode ran to its full duration
    SessionCompleted {
        /// Mode that finished
        mode: Mode,
        /// Mode now active
        next: Mode,
    },
    /// A focus session ran to completion (task-tracking signal)
    FocusSessionCompleted {
        /// Focus sessions finished so far
        completed_cycles: u32,
    },
    /// Settings were replaced
    SettingsChanged {
        /// New settings
        settings: Settings,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the settings, the state and the tick signal.
pub struct TimerEngine {
    /// Active settings
    settings: Settings,
    /// Current timer state
    state: EngineState,
    /// Settings persistence collaborator
    store: Box<dyn SettingsStore>,
    /// One-second tick signal, armed only while running
    ticks: Box<dyn TickSource>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new TimerEngine in the Focus-Idle state.
    ///
    /// Settings are loaded from `store`; stored settings that fail validation
    /// are replaced by the defaults.
    pub fn new(
        store: impl SettingsStore + 'static,
        ticks: impl TickSource + 'static,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let mut settings = store.load();
        if let Err(e) = settings.validate() {
            warn!(error = %e, "stored settings are invalid, using defaults");
            settings = Settings::default();
        }
        debug!(?settings, "timer engine created");

        Self {
            settings,
            state: EngineState::new(),
            store: Box::new(store),
            ticks: Box::new(ticks),
            event_tx,
        }
    }

    /// Starts counting the current mode. No-op if already running.
    pub fn start(&mut self) {
        if self.state.is_running {
            return;
        }

        self.state.is_running = true;
        self.ticks.arm();
        info!(mode = %self.state.mode, elapsed = self.state.elapsed_seconds, "session started");

        self.emit(TimerEvent::SessionStarted {
            mode: self.state.mode,
        });
    }

    /// Pauses the timer. No-op if already paused.
    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }

        self.ticks.disarm();
        self.state.is_running = false;
        info!(mode = %self.state.mode, elapsed = self.state.elapsed_seconds, "session paused");

        self.emit(TimerEvent::SessionPaused {
            mode: self.state.mode,
        });
    }

    /// Pauses and clears the elapsed time of the current mode.
    ///
    /// Mode and cycle counters are left as they are.
    pub fn reset(&mut self) {
        self.pause();
        self.state.elapsed_seconds = 0;
        info!(mode = %self.state.mode, "session reset");

        self.emit(TimerEvent::SessionReset {
            mode: self.state.mode,
        });
    }

    /// Pauses and moves on to the next mode as if the current one had
    /// completed.
    pub fn skip(&mut self) {
        self.pause();
        self.state.elapsed_seconds = 0;

        let skipped = self.state.mode;
        let next = self.advance();
        info!(mode = %skipped, next = %next, "session skipped");

        self.emit(TimerEvent::SessionSkipped {
            mode: skipped,
            next,
        });
    }

    /// Merges `update` into the settings and resets the timer.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if any provided value is zero. Nothing is
    /// changed in that case.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<(), ValidationError> {
        update.validate()?;
        let settings = self.settings.merged(&update);
        settings.validate()?;

        self.settings = settings;
        self.store.save(&self.settings);
        info!(?settings, "settings updated");

        self.emit(TimerEvent::SettingsChanged { settings });
        self.reset();
        Ok(())
    }

    /// Advances the elapsed time by one second.
    ///
    /// Reaching the mode's duration completes the session: the timer stops,
    /// the next mode becomes active and elapsed time returns to zero.
    /// Ticks delivered while paused are ignored.
    pub fn tick(&mut self) {
        if !self.state.is_running {
            debug!("tick ignored while paused");
            return;
        }

        self.state.elapsed_seconds += 1;

        if self.state.elapsed_seconds >= self.total_seconds() {
            self.handle_timer_complete();
        }
    }

    /// Handles session completion (mode transitions).
    fn handle_timer_complete(&mut self) {
        self.ticks.disarm();
        self.state.is_running = false;

        let finished = self.state.mode;
        let next = self.advance();
        self.state.elapsed_seconds = 0;
        info!(mode = %finished, next = %next, "session completed");

        self.emit(TimerEvent::SessionCompleted {
            mode: finished,
            next,
        });

        if finished == Mode::Focus {
            self.emit(TimerEvent::FocusSessionCompleted {
                completed_cycles: self.state.completed_cycles,
            });
        }
    }

    /// Moves to the mode that follows the current one and returns it.
    fn advance(&mut self) -> Mode {
        let next = match self.state.mode {
            Mode::Focus => {
                self.state.completed_cycles += 1;
                if self.state.completed_cycles % self.settings.cycles == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak => Mode::Focus,
            Mode::LongBreak => {
                self.state.current_cycle += 1;
                Mode::Focus
            }
        };

        self.state.mode = next;
        next
    }

    /// Waits for the next tick of the owned tick signal.
    ///
    /// Never resolves while the timer is paused.
    pub async fn next_tick(&mut self) {
        std::future::poll_fn(|cx| self.ticks.poll_tick(cx)).await
    }

    /// Sends an event; a closed channel only means nobody is listening.
    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("no event subscriber, event dropped");
        }
    }

    /// Returns the duration of the current mode in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.settings.total_seconds(self.state.mode)
    }

    /// Returns true if the timer is counting.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Returns the derived read-only view of the engine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state, &self.settings)
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &EngineState {
        &self.state
    }

    /// Returns the active settings.
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.ticks.disarm();
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("ticking", &self.ticks.is_armed())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ticks::ManualTicks;
    use crate::store::MemorySettingsStore;

    fn create_engine() -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        create_engine_with_settings(Settings::default())
    }

    fn create_engine_with_settings(
        settings: Settings,
    ) -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(MemorySettingsStore::with_settings(settings), ManualTicks::new(), tx);
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn tick_n(engine: &mut TimerEngine, n: u64) {
        for _ in 0..n {
            engine.tick();
        }
    }

    // ------------------------------------------------------------------------
    // TimerEngine Tests
    // ------------------------------------------------------------------------

    mod timer_engine_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let (engine, _rx) = create_engine();
            let state = engine.get_state();

            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(state.elapsed_seconds, 0);
            assert!(!state.is_running);
            assert_eq!(state.current_cycle, 1);
            assert_eq!(state.completed_cycles, 0);
            assert_eq!(engine.total_seconds(), 1500);
        }

        #[test]
        fn test_new_engine_uses_stored_settings() {
            let settings = Settings {
                focus: 50,
                short_break: 10,
                long_break: 30,
                cycles: 2,
            };
            let (engine, _rx) = create_engine_with_settings(settings);
            assert_eq!(*engine.get_settings(), settings);
            assert_eq!(engine.total_seconds(), 3000);
        }

        #[test]
        fn test_new_engine_rejects_invalid_stored_settings() {
            let settings = Settings {
                cycles: 0,
                ..Settings::default()
            };
            let (engine, _rx) = create_engine_with_settings(settings);
            assert_eq!(*engine.get_settings(), Settings::default());
        }

        #[test]
        fn test_start() {
            let (mut engine, mut rx) = create_engine();

            engine.start();

            assert!(engine.is_running());
            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::SessionStarted { mode: Mode::Focus }
            );
        }

        #[test]
        fn test_start_already_running_is_noop() {
            let ticks = ManualTicks::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(MemorySettingsStore::new(), ticks.clone(), tx);

            engine.start();
            engine.start();

            assert_eq!(drain(&mut rx).len(), 1);
            assert_eq!(ticks.arm_count(), 1);
        }

        #[test]
        fn test_pause() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            tick_n(&mut engine, 30);
            let _ = rx.try_recv();

            engine.pause();

            assert!(!engine.is_running());
            assert_eq!(engine.get_state().elapsed_seconds, 30);
            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::SessionPaused { mode: Mode::Focus }
            );
        }

        #[test]
        fn test_pause_not_running_is_noop() {
            let (mut engine, mut rx) = create_engine();

            engine.pause();

            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_pause_releases_tick_signal() {
            let ticks = ManualTicks::new();
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(MemorySettingsStore::new(), ticks.clone(), tx);

            engine.start();
            assert!(ticks.is_armed());
            engine.pause();
            assert!(!ticks.is_armed());
        }

        #[test]
        fn test_tick_while_paused_is_ignored() {
            let (mut engine, _rx) = create_engine();

            tick_n(&mut engine, 5);

            assert_eq!(engine.get_state().elapsed_seconds, 0);
        }

        #[test]
        fn test_resume_preserves_elapsed() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            tick_n(&mut engine, 100);
            engine.pause();
            engine.start();
            tick_n(&mut engine, 5);

            assert_eq!(engine.get_state().elapsed_seconds, 105);
        }

        #[test]
        fn test_reset_while_running() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            tick_n(&mut engine, 42);
            drain(&mut rx);

            engine.reset();

            let state = engine.get_state();
            assert_eq!(state.elapsed_seconds, 0);
            assert!(!state.is_running);
            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::SessionPaused { mode: Mode::Focus },
                    TimerEvent::SessionReset { mode: Mode::Focus },
                ]
            );
        }

        #[test]
        fn test_reset_keeps_mode_and_counters() {
            let (mut engine, mut rx) = create_engine();
            {
                let state = engine.get_state_mut();
                state.mode = Mode::ShortBreak;
                state.completed_cycles = 3;
                state.current_cycle = 2;
                state.elapsed_seconds = 120;
            }

            engine.reset();

            let state = engine.get_state();
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.completed_cycles, 3);
            assert_eq!(state.current_cycle, 2);
            assert_eq!(state.elapsed_seconds, 0);
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::SessionReset {
                    mode: Mode::ShortBreak
                }]
            );
        }

        #[test]
        fn test_handle_timer_complete_focus_to_short_break() {
            let ticks = ManualTicks::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(MemorySettingsStore::new(), ticks.clone(), tx);

            engine.start();
            let _ = rx.try_recv();
            tick_n(&mut engine, 1500);

            let state = engine.get_state();
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.completed_cycles, 1);
            assert_eq!(state.elapsed_seconds, 0);
            assert!(!state.is_running);
            assert!(!ticks.is_armed());

            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::SessionCompleted {
                        mode: Mode::Focus,
                        next: Mode::ShortBreak
                    },
                    TimerEvent::FocusSessionCompleted { completed_cycles: 1 },
                ]
            );
        }

        #[test]
        fn test_elapsed_never_reaches_total() {
            let settings = Settings {
                focus: 1,
                ..Settings::default()
            };
            let (mut engine, _rx) = create_engine_with_settings(settings);
            engine.start();

            for _ in 0..59 {
                engine.tick();
                assert!(engine.get_state().elapsed_seconds < engine.total_seconds());
            }
            engine.tick();
            assert_eq!(engine.get_state().elapsed_seconds, 0);
        }

        #[test]
        fn test_long_break_at_multiples_of_cycles() {
            let (mut engine, _rx) = create_engine();

            for count in [4, 8, 12] {
                {
                    let state = engine.get_state_mut();
                    state.completed_cycles = count - 1;
                    state.mode = Mode::Focus;
                }
                engine.skip();

                assert_eq!(
                    engine.get_state().mode,
                    Mode::LongBreak,
                    "Expected LongBreak at completed count {}",
                    count
                );
            }
        }

        #[test]
        fn test_short_break_at_non_multiples_of_cycles() {
            let (mut engine, _rx) = create_engine();

            for count in [1, 2, 3, 5, 6, 7] {
                {
                    let state = engine.get_state_mut();
                    state.completed_cycles = count - 1;
                    state.mode = Mode::Focus;
                }
                engine.skip();

                assert_eq!(
                    engine.get_state().mode,
                    Mode::ShortBreak,
                    "Expected ShortBreak at completed count {}",
                    count
                );
            }
        }

        #[test]
        fn test_single_cycle_setting_always_long_break() {
            let settings = Settings {
                cycles: 1,
                ..Settings::default()
            };
            let (mut engine, _rx) = create_engine_with_settings(settings);

            engine.skip();
            assert_eq!(engine.get_state().mode, Mode::LongBreak);
            engine.skip();
            assert_eq!(engine.get_state().mode, Mode::Focus);
            assert_eq!(engine.get_state().current_cycle, 2);
            engine.skip();
            assert_eq!(engine.get_state().mode, Mode::LongBreak);
        }

        #[test]
        fn test_skip_during_focus() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            tick_n(&mut engine, 10);
            drain(&mut rx);

            engine.skip();

            let state = engine.get_state();
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.completed_cycles, 1);
            assert_eq!(state.elapsed_seconds, 0);
            assert!(!state.is_running);
            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::SessionPaused { mode: Mode::Focus },
                    TimerEvent::SessionSkipped {
                        mode: Mode::Focus,
                        next: Mode::ShortBreak
                    },
                ]
            );
        }

        #[test]
        fn test_skip_short_break_keeps_cycle() {
            let (mut engine, _rx) = create_engine();
            engine.get_state_mut().mode = Mode::ShortBreak;

            engine.skip();

            assert_eq!(engine.get_state().mode, Mode::Focus);
            assert_eq!(engine.get_state().current_cycle, 1);
        }

        #[test]
        fn test_skip_long_break_increments_cycle() {
            let (mut engine, _rx) = create_engine();
            engine.get_state_mut().mode = Mode::LongBreak;

            engine.skip();

            assert_eq!(engine.get_state().mode, Mode::Focus);
            assert_eq!(engine.get_state().current_cycle, 2);
        }

        #[test]
        fn test_update_settings() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let store = MemorySettingsStore::new();
            let mut engine = TimerEngine::new(store.clone(), ManualTicks::new(), tx);
            engine.start();
            tick_n(&mut engine, 99);
            drain(&mut rx);

            engine
                .update_settings(SettingsUpdate::default().with_focus(50))
                .unwrap();

            let expected = Settings {
                focus: 50,
                ..Settings::default()
            };
            assert_eq!(*engine.get_settings(), expected);
            assert_eq!(store.saved(), vec![expected]);
            assert_eq!(engine.get_state().elapsed_seconds, 0);
            assert!(!engine.is_running());
            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::SettingsChanged { settings: expected },
                    TimerEvent::SessionPaused { mode: Mode::Focus },
                    TimerEvent::SessionReset { mode: Mode::Focus },
                ]
            );
        }

        #[test]
        fn test_update_settings_rejects_zero() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let store = MemorySettingsStore::new();
            let mut engine = TimerEngine::new(store.clone(), ManualTicks::new(), tx);
            engine.start();
            tick_n(&mut engine, 10);
            drain(&mut rx);

            let result = engine.update_settings(SettingsUpdate::default().with_focus(0));

            assert!(matches!(
                result,
                Err(ValidationError::NonPositiveDuration { field: "focus", .. })
            ));
            assert_eq!(*engine.get_settings(), Settings::default());
            assert_eq!(engine.get_state().elapsed_seconds, 10);
            assert!(engine.is_running());
            assert!(store.saved().is_empty());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_update_settings_rejects_partial_invalid() {
            let (mut engine, _rx) = create_engine();

            let result = engine.update_settings(SettingsUpdate::default().with_focus(30).with_cycles(0));

            assert_eq!(result, Err(ValidationError::InvalidCycles(0)));
            assert_eq!(engine.get_settings().focus, 25);
        }

        #[test]
        fn test_update_settings_changes_long_break_trigger() {
            let (mut engine, _rx) = create_engine();
            engine
                .update_settings(SettingsUpdate::default().with_cycles(2))
                .unwrap();

            engine.skip();
            assert_eq!(engine.get_state().mode, Mode::ShortBreak);
            engine.skip();
            engine.skip();
            assert_eq!(engine.get_state().mode, Mode::LongBreak);
        }

        #[test]
        fn test_snapshot() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            tick_n(&mut engine, 75);

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.display_time, "23:45");
            assert!((snapshot.percent_complete - 5.0).abs() < 1e-9);
            assert!(snapshot.is_running);
            assert_eq!(snapshot.current_cycle, 1);
        }

        #[test]
        fn test_events_without_subscriber_do_not_fail() {
            let (mut engine, rx) = create_engine();
            drop(rx);

            engine.start();
            engine.skip();

            assert_eq!(engine.get_state().mode, Mode::ShortBreak);
        }

        #[test]
        fn test_drop_releases_tick_signal() {
            let ticks = ManualTicks::new();
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(MemorySettingsStore::new(), ticks.clone(), tx);
            engine.start();

            drop(engine);

            assert!(!ticks.is_armed());
        }
    }
}
