use std::collections::BTreeMap;

use crate::key::Key;
use crate::view_mode::ViewMode;

pub const DEFAULT_PER_PAGE: u64 = 10;

/// Transient query state owned by one browser instance.
///
/// Any change that alters the result space (search text, a filter
/// value, the page size) snaps `page` back to 1 so the browser never
/// lands on an out-of-range page. Only `view_mode` survives beyond the
/// session, via the route query string.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub search: String,
    pub active_filters: BTreeMap<String, Key>,
    pub page: u64,
    pub per_page: u64,
    pub view_mode: ViewMode,
}

impl QueryState {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            search: String::new(),
            active_filters: BTreeMap::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            view_mode,
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search {
            self.search = text;
            self.page = 1;
        }
    }

    /// Set a filter's active value. The "all" sentinel clears the
    /// constraint entirely.
    pub fn set_filter(&mut self, filter_key: impl Into<String>, value: Key) {
        let filter_key = filter_key.into();
        if value.is_all() {
            self.active_filters.remove(&filter_key);
        } else {
            self.active_filters.insert(filter_key, value);
        }
        self.page = 1;
    }

    pub fn active_filter(&self, filter_key: &str) -> Key {
        self.active_filters
            .get(filter_key)
            .cloned()
            .unwrap_or_else(Key::all)
    }

    pub fn set_per_page(&mut self, per_page: u64) {
        let per_page = per_page.max(1);
        if per_page != self.per_page {
            self.per_page = per_page;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(ViewMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_page_change_resets_page() {
        let mut q = QueryState::default();
        q.set_page(4);
        q.set_per_page(25);
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 25);
    }

    #[test]
    fn test_same_per_page_keeps_page() {
        let mut q = QueryState::default();
        q.set_page(4);
        q.set_per_page(DEFAULT_PER_PAGE);
        assert_eq!(q.page, 4);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut q = QueryState::default();
        q.set_page(3);
        q.set_filter("stage.id", Key::Int(2));
        assert_eq!(q.page, 1);
        assert_eq!(q.active_filter("stage.id"), Key::Int(2));
    }

    #[test]
    fn test_all_sentinel_clears_filter() {
        let mut q = QueryState::default();
        q.set_filter("stage.id", Key::Int(2));
        q.set_filter("stage.id", Key::all());
        assert!(q.active_filters.is_empty());
        assert!(q.active_filter("stage.id").is_all());
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut q = QueryState::default();
        q.set_page(2);
        q.set_search("acme");
        assert_eq!(q.page, 1);
        // Re-setting the same text is not a change.
        q.set_page(2);
        q.set_search("acme");
        assert_eq!(q.page, 2);
    }

    #[test]
    fn test_page_floor_is_one() {
        let mut q = QueryState::default();
        q.set_page(0);
        assert_eq!(q.page, 1);
    }
}
