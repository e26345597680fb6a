use std::sync::Mutex;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Where create/update/delete outcomes surface. Message text only;
/// hosts that want structured payloads keep them on their own side of
/// the adapter.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Writes notices to stderr so they survive alternate-screen TUIs.
pub struct ConsoleNotifier;

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        use owo_colors::OwoColorize;
        match level {
            NoticeLevel::Success => eprintln!("{} {}", "✅".green(), message),
            NoticeLevel::Info => eprintln!("{} {}", "ℹ️".cyan(), message),
            NoticeLevel::Warning => eprintln!("{} {}", "⚠️".yellow(), message),
            NoticeLevel::Error => eprintln!("{} {}", "❌".red(), message),
        }
    }
}

/// Captures notices for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(NoticeLevel, String)> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
