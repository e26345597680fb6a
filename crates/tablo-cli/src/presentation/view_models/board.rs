use serde::Serialize;

use tablo_types::Key;

use super::CardViewModel;

#[derive(Debug, Clone, Serialize)]
pub struct BoardColumnViewModel {
    pub id: Key,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub count: usize,
    pub cards: Vec<CardViewModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardViewModel {
    pub columns: Vec<BoardColumnViewModel>,
    /// Card currently lifted by a drag, dimmed in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging: Option<Key>,
    pub total: usize,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
