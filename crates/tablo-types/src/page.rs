use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Pagination metadata attached to a fetched collection page.
///
/// Backends disagree on casing (`last_page` vs `lastPage`) and on which
/// fields they bother to send; everything here is optional and aliased
/// so any of the common shapes deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, alias = "lastPage")]
    pub last_page: Option<u64>,
    #[serde(default, alias = "currentPage")]
    pub current_page: Option<u64>,
    #[serde(default, alias = "perPage")]
    pub per_page: Option<u64>,
}

/// One fetched page of records plus metadata. Pages are replaced
/// wholesale on every fetch; partial results are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(alias = "items")]
    pub data: Vec<Record>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl Page {
    pub fn new(data: Vec<Record>, meta: PageMeta) -> Self {
        Self { data, meta }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
