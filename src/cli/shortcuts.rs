//! Keyboard shortcuts for the interactive session.
//!
//! Input is read a line at a time, so each shortcut is a short word followed
//! by Enter. An empty line toggles the timer.

use std::fmt;

use crate::engine::Command;

// ============================================================================
// Shortcut
// ============================================================================

/// Actions that can be triggered from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Start if paused, pause if running
    Toggle,
    /// Clear the elapsed time of the current mode
    Reset,
    /// Move on to the next mode
    Skip,
    /// Turn desktop notifications on or off
    Notify,
    /// Show the shortcut list
    Help,
    /// End the session
    Quit,
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortcut::Toggle => write!(f, "toggle"),
            Shortcut::Reset => write!(f, "reset"),
            Shortcut::Skip => write!(f, "skip"),
            Shortcut::Notify => write!(f, "notify"),
            Shortcut::Help => write!(f, "help"),
            Shortcut::Quit => write!(f, "quit"),
        }
    }
}

impl Shortcut {
    /// Every shortcut, in help order.
    pub const ALL: [Shortcut; 6] = [
        Shortcut::Toggle,
        Shortcut::Reset,
        Shortcut::Skip,
        Shortcut::Notify,
        Shortcut::Help,
        Shortcut::Quit,
    ];

    /// Parses one line of input. Case and surrounding whitespace are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "space" | "p" | "start" | "pause" => Some(Shortcut::Toggle),
            "r" | "reset" => Some(Shortcut::Reset),
            "s" | "skip" => Some(Shortcut::Skip),
            "n" | "notify" => Some(Shortcut::Notify),
            "?" | "h" | "help" => Some(Shortcut::Help),
            "q" | "quit" | "exit" => Some(Shortcut::Quit),
            _ => None,
        }
    }

    /// Returns the key shown in the help text.
    pub fn key(&self) -> &'static str {
        match self {
            Shortcut::Toggle => "Enter / p",
            Shortcut::Reset => "r",
            Shortcut::Skip => "s",
            Shortcut::Notify => "n",
            Shortcut::Help => "? / h",
            Shortcut::Quit => "q",
        }
    }

    /// Returns a human-readable description of this shortcut.
    pub fn description(&self) -> &'static str {
        match self {
            Shortcut::Toggle => "start or pause the timer",
            Shortcut::Reset => "reset the current session",
            Shortcut::Skip => "skip to the next session",
            Shortcut::Notify => "turn desktop notifications on or off",
            Shortcut::Help => "show this help",
            Shortcut::Quit => "quit",
        }
    }

    /// Returns the runner command for this shortcut.
    ///
    /// `Help` and `Notify` have no engine command; `Quit` maps to
    /// `Command::Shutdown`.
    pub fn to_command(&self) -> Option<Command> {
        match self {
            Shortcut::Toggle => Some(Command::Toggle),
            Shortcut::Reset => Some(Command::Reset),
            Shortcut::Skip => Some(Command::Skip),
            Shortcut::Quit => Some(Command::Shutdown),
            Shortcut::Notify | Shortcut::Help => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
