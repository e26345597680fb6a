use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::key::Key;
use crate::path::FieldPath;
use crate::record::Record;

/// Caller-supplied cell projection, used instead of the raw field
/// lookup when a column needs computed or joined content.
pub type CellRender = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Caller-supplied card body for list and grid layouts; each element is
/// one line of the card.
pub type CardRender = Arc<dyn Fn(&Record) -> Vec<String> + Send + Sync>;

/// Transform applied to every fetched page before filtering and
/// rendering, for callers that need to reshape adapter output.
pub type DataMapper = Arc<dyn Fn(Vec<Record>) -> Vec<Record> + Send + Sync>;

/// Declares how one column/cell of a record is projected.
#[derive(Clone)]
pub struct FieldSpec {
    pub key: FieldPath,
    pub label: String,
    /// Preferred column width in cells; views fall back to even
    /// distribution when absent.
    pub width: Option<u16>,
    pub sortable: bool,
    pub render: Option<CellRender>,
}

impl FieldSpec {
    pub fn new(key: impl Into<FieldPath>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            sortable: false,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(mut self, render: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Projected cell text for a record: the custom renderer when one
    /// is declared, the raw field lookup otherwise.
    pub fn cell(&self, record: &Record) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record.text(&self.key).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// One selectable value of a discrete filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: Key,
}

/// A discrete filter over one record field. The active value defaults
/// to the "all" sentinel, meaning no constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub key: FieldPath,
    pub label: String,
    pub options: Vec<FilterOption>,
}

impl FilterSpec {
    pub fn new(key: impl Into<FieldPath>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, label: impl Into<String>, value: impl Into<Key>) -> Self {
        self.options.push(FilterOption {
            label: label.into(),
            value: value.into(),
        });
        self
    }
}

/// A kanban column. Declared by the caller, never derived from data:
/// an empty column still renders, and a column the data never mentions
/// still exists as a drop target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: Key,
    pub label: String,
    /// Named accent color resolved by the view layer (e.g. "cyan").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ColumnSpec {
    pub fn new(id: impl Into<Key>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Caller-supplied client-side predicate.
///
/// **This fully replaces generic filter-field matching.** When a
/// predicate is present, declared [`FilterSpec`] values are *not*
/// applied by the engine; the predicate receives the search text and
/// the active filter map and must re-implement whatever filter
/// semantics it needs. The two never compose.
pub type ClientPredicate =
    Arc<dyn Fn(&Record, &str, &BTreeMap<String, Key>) -> bool + Send + Sync>;
