//! CLI module for the Pomodoro timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `shortcuts`: Line-based shortcuts for the interactive session
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod shortcuts;

pub use commands::{Cli, Commands, RunArgs, SettingsArgs, Switch, TaskCommand};
pub use display::Display;
pub use shortcuts::Shortcut;
