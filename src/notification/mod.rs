//! Desktop notifications for finished and skipped sessions.
//!
//! Notifications are off until the user turns them on; the choice is kept in
//! `<data-dir>/notifications.json`. Sending goes through the `Notifier` trait
//! so the session loop can be tested without a notification server.

mod error;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use notify_rust::{Notification, Timeout};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::TimerEvent;
use crate::store::{read_json, write_json, StoreError, NOTIFICATIONS_FILE};
use crate::types::Mode;

pub use error::NotificationError;

/// Application name reported to the notification server.
const APP_NAME: &str = "pomodoro";

/// How long a notification stays on screen.
const DISPLAY_MS: u32 = 5000;

// ============================================================================
// Notice
// ============================================================================

/// Content of one desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub summary: String,
    pub body: String,
}

impl Notice {
    /// Returns the notice for a session change, if the event is one.
    pub fn for_event(event: &TimerEvent) -> Option<Self> {
        let (mode, next, verb) = match event {
            TimerEvent::SessionCompleted { mode, next } => (*mode, *next, "complete"),
            TimerEvent::SessionSkipped { mode, next } => (*mode, *next, "skipped"),
            _ => return None,
        };

        let summary = if next.is_break() {
            format!("{} time", next.label())
        } else {
            "Back to focus".to_string()
        };
        Some(Self {
            summary,
            body: format!("{} {verb}. {}", mode.label(), prompt(next)),
        })
    }
}

fn prompt(next: Mode) -> &'static str {
    match next {
        Mode::Focus => "Time to concentrate on your work!",
        Mode::ShortBreak => "Take a quick break!",
        Mode::LongBreak => "Time for a longer break. You deserve it!",
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Trait for notification backends.
pub trait Notifier: Send + Sync {
    /// Shows `notice`. May block until the notification server answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}

/// Sends notifications to the desktop notification service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        Notification::new()
            .appname(APP_NAME)
            .summary(&notice.summary)
            .body(&notice.body)
            .timeout(Timeout::Milliseconds(DISPLAY_MS))
            .show()
            .map(drop)
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

/// Mock notifier for testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<Notice>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns the notices shown so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("mock failure".to_string()));
        }
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// The notification toggle together with its backend. Clones share state.
#[derive(Clone)]
pub struct Notifications {
    notifier: Arc<dyn Notifier>,
    enabled: Arc<AtomicBool>,
}

impl Notifications {
    pub fn new(notifier: impl Notifier + 'static, enabled: bool) -> Self {
        Self {
            notifier: Arc::new(notifier),
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flips the toggle and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }

    /// Returns the notice to show for `event`, or `None` when notifications
    /// are off or the event is not a session change.
    pub fn notice_for(&self, event: &TimerEvent) -> Option<Notice> {
        if !self.is_enabled() {
            return None;
        }
        Notice::for_event(event)
    }

    /// Shows `notice`, logging failures. Returns true if it was delivered.
    pub fn send(&self, notice: &Notice) -> bool {
        match self.notifier.notify(notice) {
            Ok(()) => {
                debug!(summary = %notice.summary, "notification sent");
                true
            }
            Err(e) => {
                warn!(error = %e, hint = e.suggestion(), "notification not shown");
                false
            }
        }
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Persisted notification preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    #[serde(default)]
    pub enabled: bool,
}

/// Persists `NotificationPrefs` as JSON.
#[derive(Debug, Clone)]
pub struct NotificationPrefsStore {
    path: PathBuf,
}

impl NotificationPrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `notifications.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(NOTIFICATIONS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the preference. A missing file means notifications are off.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<NotificationPrefs, StoreError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Saves the preference, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, prefs: NotificationPrefs) -> Result<(), StoreError> {
        write_json(&self.path, &prefs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(mode: Mode, next: Mode) -> TimerEvent {
        TimerEvent::SessionCompleted { mode, next }
    }

    // ------------------------------------------------------------------------
    // Notice Tests
    // ------------------------------------------------------------------------

    mod notice_tests {
        use super::*;

        #[test]
        fn test_focus_completion_announces_break() {
            let notice = Notice::for_event(&completed(Mode::Focus, Mode::ShortBreak)).unwrap();
            assert_eq!(notice.summary, "Short Break time");
            assert_eq!(notice.body, "Focus Session complete. Take a quick break!");
        }

        #[test]
        fn test_break_skip_announces_focus() {
            let notice = Notice::for_event(&TimerEvent::SessionSkipped {
                mode: Mode::LongBreak,
                next: Mode::Focus,
            })
            .unwrap();
            assert_eq!(notice.summary, "Back to focus");
            assert!(notice.body.starts_with("Long Break skipped."));
        }

        #[test]
        fn test_other_events_have_no_notice() {
            for event in [
                TimerEvent::SessionStarted { mode: Mode::Focus },
                TimerEvent::SessionPaused { mode: Mode::Focus },
                TimerEvent::SessionReset { mode: Mode::Focus },
                TimerEvent::FocusSessionCompleted { completed_cycles: 1 },
            ] {
                assert_eq!(Notice::for_event(&event), None, "{event:?}");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Notifications Tests
    // ------------------------------------------------------------------------

    mod notifications_tests {
        use super::*;

        #[test]
        fn test_disabled_yields_no_notice() {
            let notifications = Notifications::new(MockNotifier::new(), false);
            assert!(notifications
                .notice_for(&completed(Mode::Focus, Mode::LongBreak))
                .is_none());
        }

        #[test]
        fn test_enabled_sends_notice() {
            let mock = MockNotifier::new();
            let notifications = Notifications::new(mock.clone(), true);

            let notice = notifications
                .notice_for(&completed(Mode::Focus, Mode::LongBreak))
                .unwrap();
            assert!(notifications.send(&notice));

            assert_eq!(mock.sent(), vec![notice]);
        }

        #[test]
        fn test_send_failure_is_reported() {
            let mock = MockNotifier::new();
            mock.set_should_fail(true);
            let notifications = Notifications::new(mock.clone(), true);

            let notice = Notice::for_event(&completed(Mode::ShortBreak, Mode::Focus)).unwrap();
            assert!(!notifications.send(&notice));
            assert!(mock.sent().is_empty());
        }

        #[test]
        fn test_toggle_is_shared_between_clones() {
            let notifications = Notifications::new(MockNotifier::new(), false);
            let other = notifications.clone();

            assert!(notifications.toggle());
            assert!(other.is_enabled());
            assert!(!other.toggle());
            assert!(!notifications.is_enabled());

            other.set_enabled(true);
            assert!(notifications.is_enabled());
        }
    }

    // ------------------------------------------------------------------------
    // Preferences Tests
    // ------------------------------------------------------------------------

    mod prefs_tests {
        use super::*;

        #[test]
        fn test_missing_file_means_off() {
            let dir = tempfile::tempdir().unwrap();
            let store = NotificationPrefsStore::in_dir(dir.path());
            assert!(!store.load().unwrap().enabled);
        }

        #[test]
        fn test_preference_survives_reload() {
            let dir = tempfile::tempdir().unwrap();
            let store = NotificationPrefsStore::in_dir(dir.path());
            store.save(NotificationPrefs { enabled: true }).unwrap();

            let reloaded = NotificationPrefsStore::in_dir(dir.path()).load().unwrap();
            assert!(reloaded.enabled);

            let content = std::fs::read_to_string(store.path()).unwrap();
            assert!(content.contains("\"enabled\": true"));
        }

        #[test]
        fn test_corrupt_file_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let store = NotificationPrefsStore::in_dir(dir.path());
            std::fs::write(store.path(), "{enabled").unwrap();
            assert!(store.load().unwrap_err().is_corrupt());
        }
    }
}
