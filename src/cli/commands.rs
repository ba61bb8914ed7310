//! Command definitions for the Pomodoro timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::sound::DEFAULT_VOLUME;
use crate::types::SettingsUpdate;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro timer - focus sessions and breaks in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro",
    version,
    about = "Pomodoro timer for the terminal",
    long_about = "A terminal Pomodoro timer: focus sessions alternate with short breaks,\n\
                  with a long break after every few focus sessions.\n\
                  Finished focus sessions are credited to the current task.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for settings.json and tasks.json
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show or change durations and cycles
    Settings(SettingsArgs),

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Show or change whether desktop notifications are shown
    Notifications {
        /// New state; omit to show the current one
        #[arg(value_enum)]
        state: Option<Switch>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Disable sound cues
    #[arg(long)]
    pub no_sound: bool,

    /// Sound volume (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_VOLUME, value_parser = parse_volume)]
    pub volume: f32,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            no_sound: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

// ============================================================================
// Settings Command Arguments
// ============================================================================

/// Arguments for the settings command. With no flags the current settings
/// are shown.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Focus duration in minutes
    #[arg(short, long)]
    pub focus: Option<u32>,

    /// Short break duration in minutes
    #[arg(short, long)]
    pub short_break: Option<u32>,

    /// Long break duration in minutes
    #[arg(short, long)]
    pub long_break: Option<u32>,

    /// Focus sessions before a long break
    #[arg(short, long)]
    pub cycles: Option<u32>,
}

impl SettingsArgs {
    /// Returns the requested changes.
    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            focus: self.focus,
            short_break: self.short_break,
            long_break: self.long_break,
            cycles: self.cycles,
        }
    }
}

// ============================================================================
// Task Subcommands
// ============================================================================

/// Task management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task (the first task becomes current)
    Add {
        /// Task title (at most 100 characters)
        title: String,
    },

    /// List tasks
    List,

    /// Remove a task by id or id prefix
    Remove {
        /// Task id or unique prefix
        id: String,
    },

    /// Make a task current
    Select {
        /// Task id or unique prefix
        id: String,
    },

    /// Clear the current task
    Clear,
}

// ============================================================================
// Notifications
// ============================================================================

/// On/off value for a persisted preference.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a volume in `[0.0, 1.0]`.
fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err("volume must be between 0.0 and 1.0".to_string());
    }
    Ok(volume)
}

// ============================================================================
// Tests
// ============================================================================
