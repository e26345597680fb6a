use std::cmp::Ordering;

use tablo_types::{FieldPath, Record};

/// Client-side sort over the fetched page, driven by sortable columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortState {
    pub key: Option<FieldPath>,
    pub descending: bool,
}

impl SortState {
    /// Toggle sorting on a column: first press sorts ascending, a
    /// second press on the same column flips direction.
    pub fn toggle(&mut self, key: &FieldPath) {
        if self.key.as_ref() == Some(key) {
            self.descending = !self.descending;
        } else {
            self.key = Some(key.clone());
            self.descending = false;
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.descending = false;
    }

    /// Stable sort of the page. Values that both parse as numbers
    /// compare numerically, everything else lexically; missing fields
    /// sort last regardless of direction.
    pub fn apply(&self, items: &mut [Record]) {
        let Some(key) = &self.key else {
            return;
        };
        items.sort_by(|a, b| {
            let ordering = match (a.text(key), b.text(key)) {
                (Some(a), Some(b)) => {
                    let cmp = compare_values(&a, &b);
                    if self.descending { cmp.reverse() } else { cmp }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            ordering
        });
    }
}

fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}
