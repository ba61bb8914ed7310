//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro timer CLI.
//! It includes:
//! - Timer engine: modes, cycle counting and the one-second tick
//! - Async runner that serializes commands and ticks
//! - Settings persistence
//! - Task tracking credited on finished focus sessions
//! - Sound cues for timer events
//! - Desktop notifications when a session ends
//! - CLI command parsing and display utilities

pub mod cli;
pub mod engine;
pub mod notification;
pub mod sound;
pub mod store;
pub mod tasks;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_time, percent_complete, EngineState, Mode, Settings, SettingsUpdate, Snapshot,
};

// Re-export engine types
pub use engine::{
    Command, EngineRunner, IntervalTicks, ManualTicks, TickSource, TimerEngine, TimerEvent,
    ValidationError,
};

// Re-export persistence and task types
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsStore, StoreError};
pub use tasks::{Task, TaskError, TaskList, TaskStore, TaskTracker};

// Re-export notification types
pub use notification::{
    DesktopNotifier, MockNotifier, NotificationError, Notifications, Notice, Notifier,
};

// Re-export sound types
pub use sound::{
    MockSoundPlayer, RodioSoundPlayer, SoundCue, SoundError, SoundPlayer, SoundWorker,
};
