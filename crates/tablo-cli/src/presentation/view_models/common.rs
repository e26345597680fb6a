use serde::Serialize;

use tablo_types::ViewMode;

/// Bottom bar state: query summary, pager, last notification, and the
/// in-progress search input when the user is typing one.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBarViewModel {
    pub view_mode: ViewMode,
    pub badge: StatusBadge,
    pub page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub per_page: u64,
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBadge {
    pub level: StatusLevel,
    pub label: String,
}

impl StatusBadge {
    pub fn success(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            label: label.into(),
        }
    }

    pub fn info(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            label: label.into(),
        }
    }

    pub fn error(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Info,
    Error,
}
