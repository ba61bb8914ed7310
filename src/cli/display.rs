//! Display utilities for the Pomodoro timer CLI.
//!
//! `render_*` functions build the text and are unit tested; `show_*`
//! functions print it.

use std::io::{self, Write};

use tracing::debug;

use crate::engine::TimerEvent;
use crate::tasks::{Task, TaskList};
use crate::types::{Mode, Settings, Snapshot};

use super::shortcuts::Shortcut;

/// Width of the progress bar in cells.
const BAR_WIDTH: usize = 10;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------------

    /// Renders the one-line status shown during a session.
    pub fn render_status(snapshot: &Snapshot) -> String {
        format!(
            "[{}] {} {} {:>3.0}% · cycle {} · {} · {}",
            snapshot.mode.label(),
            snapshot.display_time,
            Self::progress_bar(snapshot.percent_complete),
            snapshot.percent_complete,
            snapshot.current_cycle,
            Self::cycle_dots(snapshot),
            if snapshot.is_running { "running" } else { "paused" },
        )
    }

    /// Redraws the status line in place.
    pub fn show_status_line(snapshot: &Snapshot) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = Self::write_status_line(&mut stdout, snapshot) {
            debug!(error = %e, "status line not written");
        }
    }

    fn write_status_line(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
        // Trailing spaces clear leftovers from a longer previous line.
        write!(out, "\r{}   ", Self::render_status(snapshot))?;
        out.flush()
    }

    /// Renders one dot per focus session in the current set.
    ///
    /// Filled dots are finished sessions; the ringed dot is the session in
    /// progress and only appears during focus.
    pub fn cycle_dots(snapshot: &Snapshot) -> String {
        let cycles = snapshot.cycles.max(1);
        let done = snapshot.completed_cycles % cycles;
        (0..cycles)
            .map(|i| {
                if i < done {
                    '●'
                } else if i == done && snapshot.mode == Mode::Focus {
                    '◉'
                } else {
                    '○'
                }
            })
            .collect()
    }

    /// Renders a fixed-width progress bar for `percent` in `[0, 100]`.
    pub fn progress_bar(percent: f64) -> String {
        let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        format!(
            "▕{}{}▏",
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled)
        )
    }

    /// Returns the message announced for `event`, if any.
    ///
    /// Start, pause and reset are visible in the status line and have no
    /// message. The next mode waits idle until it is started.
    pub fn event_message(event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::SessionCompleted { mode, next } => {
                Some(format!(
                    "{} complete. {} next (press Enter to start).",
                    mode.label(),
                    next.label()
                ))
            }
            TimerEvent::SessionSkipped { mode, next } => {
                Some(format!(
                    "{} skipped. {} next (press Enter to start).",
                    mode.label(),
                    next.label()
                ))
            }
            TimerEvent::SettingsChanged { settings } => {
                Some(format!("Settings updated: {}", Self::settings_summary(settings)))
            }
            _ => None,
        }
    }

    /// Prints the message for `event` on its own line.
    pub fn show_event(event: &TimerEvent) {
        if let Some(message) = Self::event_message(event) {
            println!("\n{message}");
        }
    }

    /// Prints the message for a task credited with a finished session.
    pub fn show_task_credited(task: &Task) {
        println!("✓ {}", Self::render_credit(task));
    }

    fn render_credit(task: &Task) -> String {
        format!(
            "\"{}\" now has {} {}",
            task.title,
            task.completed_pomodoros,
            Self::pomodoro_noun(task.completed_pomodoros)
        )
    }

    /// Renders the shortcut list.
    pub fn render_help() -> String {
        let mut out = String::from("Shortcuts (type and press Enter):\n");
        for shortcut in Shortcut::ALL {
            out.push_str(&format!(
                "  {:<10} {}\n",
                shortcut.key(),
                shortcut.description()
            ));
        }
        out
    }

    /// Prints the shortcut list.
    pub fn show_help() {
        print!("\n{}", Self::render_help());
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    fn settings_summary(settings: &Settings) -> String {
        format!(
            "focus {}m, short break {}m, long break {}m, long break every {} sessions",
            settings.focus, settings.short_break, settings.long_break, settings.cycles
        )
    }

    /// Renders the settings table.
    pub fn render_settings(settings: &Settings) -> String {
        format!(
            "Focus:        {} min\n\
             Short break:  {} min\n\
             Long break:   {} min\n\
             Cycles:       {}\n",
            settings.focus, settings.short_break, settings.long_break, settings.cycles
        )
    }

    /// Prints the settings table.
    pub fn show_settings(settings: &Settings) {
        print!("{}", Self::render_settings(settings));
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Renders the task list, marking the current task with `*`.
    pub fn render_tasks(list: &TaskList) -> String {
        if list.is_empty() {
            return "No tasks. Add one with `pomodoro task add <TITLE>`.\n".to_string();
        }

        let current = list.current().map(|t| t.id);
        let mut out = String::new();
        for task in list.tasks() {
            let marker = if Some(task.id) == current { '*' } else { ' ' };
            out.push_str(&format!(
                "{} {}  {}  ({} {})\n",
                marker,
                task.short_id(),
                task.title,
                task.completed_pomodoros,
                Self::pomodoro_noun(task.completed_pomodoros)
            ));
        }
        out
    }

    /// Prints the task list.
    pub fn show_tasks(list: &TaskList) {
        print!("{}", Self::render_tasks(list));
    }

    /// Prints a one-line confirmation.
    pub fn show_success(message: &str) {
        println!("✓ {message}");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    fn pomodoro_noun(count: u32) -> &'static str {
        if count == 1 {
            "pomodoro"
        } else {
            "pomodoros"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
