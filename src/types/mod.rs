//! Core data types for the Pomodoro timer engine.
//!
//! This module defines the data structures used for:
//! - Timer modes and their durations
//! - Timer settings with validation and partial updates
//! - Engine state and the derived snapshot read by presentation code

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::ValidationError;

// ============================================================================
// Mode
// ============================================================================

/// The interval the timer is currently counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Focused work interval
    #[default]
    Focus,
    /// Short break between focus sessions
    ShortBreak,
    /// Long break after a full set of focus sessions
    LongBreak,
}

impl Mode {
    /// Returns the machine-readable name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    /// Returns the human-readable label of the mode.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus Session",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings
// ============================================================================

fn default_focus() -> u32 {
    25
}

fn default_short_break() -> u32 {
    5
}

fn default_long_break() -> u32 {
    15
}

fn default_cycles() -> u32 {
    4
}

/// Durations (in minutes) and the number of focus sessions per long break.
///
/// Settings are an immutable snapshot: updates build a new value and replace
/// the old one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Focus duration in minutes
    #[serde(default = "default_focus")]
    pub focus: u32,
    /// Short break duration in minutes
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    /// Long break duration in minutes
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    /// Focus sessions before a long break
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            cycles: default_cycles(),
        }
    }
}

impl Settings {
    /// Returns the configured duration of `mode` in minutes.
    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// Returns the configured duration of `mode` in seconds.
    pub fn total_seconds(&self, mode: Mode) -> u64 {
        u64::from(self.minutes(mode)) * 60
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        SettingsUpdate::from(*self).validate()
    }

    /// Returns a copy with every field present in `update` replaced.
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        Self {
            focus: update.focus.unwrap_or(self.focus),
            short_break: update.short_break.unwrap_or(self.short_break),
            long_break: update.long_break.unwrap_or(self.long_break),
            cycles: update.cycles.unwrap_or(self.cycles),
        }
    }
}

// ============================================================================
// SettingsUpdate
// ============================================================================

/// A partial settings change. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles: Option<u32>,
}

impl SettingsUpdate {
    /// Sets the focus duration.
    pub fn with_focus(mut self, minutes: u32) -> Self {
        self.focus = Some(minutes);
        self
    }

    /// Sets the short break duration.
    pub fn with_short_break(mut self, minutes: u32) -> Self {
        self.short_break = Some(minutes);
        self
    }

    /// Sets the long break duration.
    pub fn with_long_break(mut self, minutes: u32) -> Self {
        self.long_break = Some(minutes);
        self
    }

    /// Sets the number of focus sessions per long break.
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = Some(cycles);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.focus.is_none()
            && self.short_break.is_none()
            && self.long_break.is_none()
            && self.cycles.is_none()
    }

    /// Validates every provided field.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for the first value that is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let durations = [
            ("focus", self.focus),
            ("shortBreak", self.short_break),
            ("longBreak", self.long_break),
        ];
        for (field, value) in durations {
            if value == Some(0) {
                return Err(ValidationError::NonPositiveDuration { field, value: 0 });
            }
        }
        if let Some(cycles) = self.cycles {
            if cycles < 1 {
                return Err(ValidationError::InvalidCycles(cycles));
            }
        }
        Ok(())
    }
}

impl From<Settings> for SettingsUpdate {
    fn from(settings: Settings) -> Self {
        Self {
            focus: Some(settings.focus),
            short_break: Some(settings.short_break),
            long_break: Some(settings.long_break),
            cycles: Some(settings.cycles),
        }
    }
}

// ============================================================================
// EngineState
// ============================================================================

/// Mutable timer state. Never persisted: every process starts fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    /// Active mode
    pub mode: Mode,
    /// Seconds elapsed in the active mode, always below the mode's total
    pub elapsed_seconds: u64,
    /// Whether the tick signal is active
    pub is_running: bool,
    /// Current set of focus sessions, starting at 1
    pub current_cycle: u32,
    /// Focus sessions finished (completed or skipped)
    pub completed_cycles: u32,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            mode: Mode::Focus,
            elapsed_seconds: 0,
            is_running: false,
            current_cycle: 1,
            completed_cycles: 0,
        }
    }
}

impl EngineState {
    /// Creates the initial Focus-Idle state.
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of the engine, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub mode: Mode,
    pub is_running: bool,
    pub current_cycle: u32,
    pub completed_cycles: u32,
    pub elapsed_seconds: u64,
    pub total_seconds: u64,
    /// Remaining time as `MM:SS`
    pub display_time: String,
    /// Progress through the active mode, within `[0, 100]`
    pub percent_complete: f64,
    /// Focus sessions per long break
    pub cycles: u32,
}

impl Snapshot {
    /// Builds the snapshot for `state` under `settings`.
    pub fn from_state(state: &EngineState, settings: &Settings) -> Self {
        let total_seconds = settings.total_seconds(state.mode);
        Self {
            mode: state.mode,
            is_running: state.is_running,
            current_cycle: state.current_cycle,
            completed_cycles: state.completed_cycles,
            elapsed_seconds: state.elapsed_seconds,
            total_seconds,
            display_time: format_time(total_seconds.saturating_sub(state.elapsed_seconds)),
            percent_complete: percent_complete(state.elapsed_seconds, total_seconds),
            cycles: settings.cycles,
        }
    }
}

// ============================================================================
// Derived values
// ============================================================================

/// Formats seconds as zero-padded `MM:SS`.
///
/// Minutes are padded to two digits but never truncated.
pub fn format_time(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Returns `elapsed / total` as a percentage clamped to `[0, 100]`.
///
/// A zero total yields 0.
pub fn percent_complete(elapsed_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    let percent = elapsed_seconds as f64 / total_seconds as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

// ============================================================================
// Tests
// ============================================================================
