pub mod browser;
pub mod cache;
pub mod dialog;
pub mod error;
pub mod notify;

pub use browser::{Browser, BrowserConfig, StatusHandler};
pub use cache::{CacheSnapshot, CollectionCache, FetchKey};
pub use dialog::DialogState;
pub use error::{Error, Result};
pub use notify::{ConsoleNotifier, NoticeLevel, Notifier, RecordingNotifier};
