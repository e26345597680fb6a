use std::collections::BTreeMap;

use serde::Serialize;
use tablo_types::Key;

/// Parameters for one collection fetch.
///
/// `filters` carries only the constraints a caller chose to route
/// server-side; most declared filters are applied client-side after the
/// page arrives and never show up here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Key>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Key>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let params = ListParams::new()
            .search("acme")
            .page(1)
            .per_page(10)
            .filter("stage.id", 2i64);
        assert_eq!(params.search.as_deref(), Some("acme"));
        assert_eq!(params.page, Some(1));
        assert_eq!(params.per_page, Some(10));
        assert_eq!(params.filters.get("stage.id"), Some(&Key::Int(2)));
    }
}
