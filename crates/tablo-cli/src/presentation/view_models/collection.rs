use serde::Serialize;

use tablo_types::{Key, ViewMode};

use super::StatusBadge;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Present when the page is currently sorted on this column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowViewModel {
    pub id: Key,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

/// Card body shared by the list, grid, and board layouts.
#[derive(Debug, Clone, Serialize)]
pub struct CardViewModel {
    pub id: Key,
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagerViewModel {
    pub page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub per_page: u64,
}

/// One collection screen, fully projected. Table rows and cards are
/// both present so the JSON shape is stable across view modes.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionViewModel {
    pub endpoint: String,
    pub view_mode: ViewMode,
    pub search: String,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RowViewModel>,
    pub cards: Vec<CardViewModel>,
    pub pager: PagerViewModel,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub badge: StatusBadge,
}

impl CollectionViewModel {
    /// True when a resolved (non-loading) page has nothing to show:
    /// the explicit "no results" state, distinct from loading.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.rows.is_empty()
    }
}
