use std::sync::Mutex;

use serde_json::Value;
use tablo_types::{DEFAULT_PER_PAGE, FieldPath, Key, Page, PageMeta, Record};

use crate::adapter::ResourceAdapter;
use crate::error::{Error, Result};
use crate::params::ListParams;

/// In-memory adapter over a fixed record set.
///
/// Backs the demo dashboard and most tests. It implements the generic
/// listing contract faithfully: server-routed filters, free-text search
/// as a plain parameter, pagination with metadata, and destructive
/// delete. There is no dedicated search endpoint, so the trait's
/// default `search_page` applies.
pub struct StaticAdapter {
    endpoint: String,
    records: Mutex<Vec<Record>>,
}

impl StaticAdapter {
    pub fn new(endpoint: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            endpoint: endpoint.into(),
            records: Mutex::new(records),
        }
    }

    /// Build from raw JSON values, rejecting anything without an id.
    pub fn from_values(endpoint: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let records = values
            .into_iter()
            .map(Record::new)
            .collect::<tablo_types::Result<Vec<_>>>()?;
        Ok(Self::new(endpoint, records))
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set one field of one record, the way a backend would apply a
    /// status change. Intermediate objects must already exist.
    pub fn set_field(&self, id: &Key, path: &FieldPath, new_value: Value) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|record| record.id().coerced_eq(id))
            .ok_or_else(|| Error::NotFound(format!("{} {}", self.endpoint, id)))?;

        let mut value = records[position].value().clone();
        set_path(&mut value, path, new_value)
            .ok_or_else(|| Error::Backend(format!("no such field path: {}", path)))?;
        records[position] = Record::new(value)?;
        Ok(())
    }

    fn matching(&self, params: &ListParams) -> Vec<Record> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|record| {
                params.filters.iter().all(|(key, value)| {
                    record
                        .key_at(&FieldPath::new(key.clone()))
                        .map(|k| k.coerced_eq(value))
                        .unwrap_or(false)
                })
            })
            .filter(|record| match params.search.as_deref() {
                Some(query) if !query.is_empty() => contains_text(record.value(), query),
                _ => true,
            })
            .cloned()
            .collect()
    }
}

impl ResourceAdapter for StaticAdapter {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_page(&self, params: &ListParams) -> Result<Page> {
        let matching = self.matching(params);

        let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let page = params.page.unwrap_or(1).max(1);
        let total = matching.len() as u64;
        let last_page = total.div_ceil(per_page).max(1);

        let offset = ((page - 1) * per_page) as usize;
        let data: Vec<Record> = matching
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Ok(Page::new(
            data,
            PageMeta {
                total: Some(total),
                last_page: Some(last_page),
                current_page: Some(page),
                per_page: Some(per_page),
            },
        ))
    }

    async fn delete(&self, id: &Key) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| !record.id().coerced_eq(id));
        if records.len() == before {
            return Err(Error::NotFound(format!("{} {}", self.endpoint, id)));
        }
        Ok(())
    }
}

/// Walk `path` and replace the final segment's value. Returns `None`
/// when any intermediate segment is missing or not navigable.
fn set_path(value: &mut Value, path: &FieldPath, new_value: Value) -> Option<()> {
    let segments: Vec<&str> = path.segments().collect();
    let (last, parents) = segments.split_last()?;

    let mut current = value;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(*segment)?,
            Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Object(map) => {
            map.insert((*last).to_string(), new_value);
            Some(())
        }
        Value::Array(items) => {
            let index = last.parse::<usize>().ok()?;
            *items.get_mut(index)? = new_value;
            Some(())
        }
        _ => None,
    }
}

/// Case-insensitive substring match over every scalar in the value
/// tree. Matches values only, never key names.
fn contains_text(value: &Value, query: &str) -> bool {
    let query = query.to_lowercase();
    contains_lowered(value, &query)
}

fn contains_lowered(value: &Value, query: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(query),
        Value::Number(n) => n.to_string().contains(query),
        Value::Array(items) => items.iter().any(|v| contains_lowered(v, query)),
        Value::Object(map) => map.values().any(|v| contains_lowered(v, query)),
        Value::Bool(_) | Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leads() -> StaticAdapter {
        StaticAdapter::from_values(
            "leads",
            vec![
                json!({"id": 1, "name": "Acme Corp", "stage": {"id": 1}}),
                json!({"id": 2, "name": "Globex", "stage": {"id": 2}}),
                json!({"id": 3, "name": "Initech", "stage": {"id": 1}}),
                json!({"id": 4, "name": "Acme Labs", "stage": {"id": 3}}),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_pagination_meta() {
        let adapter = leads();
        let page = adapter
            .fetch_page(&ListParams::new().page(2).per_page(3))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.meta.total, Some(4));
        assert_eq!(page.meta.last_page, Some(2));
        assert_eq!(page.meta.current_page, Some(2));
    }

    #[tokio::test]
    async fn test_search_is_plain_parameter() {
        let adapter = leads();
        let page = adapter
            .search_page("acme", &ListParams::new().page(1).per_page(10))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.meta.total, Some(2));
    }

    #[tokio::test]
    async fn test_server_routed_filter() {
        let adapter = leads();
        let page = adapter
            .fetch_page(&ListParams::new().filter("stage.id", 1i64))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let adapter = leads();
        adapter.delete(&Key::Int(2)).await.unwrap();
        assert_eq!(adapter.len(), 3);
        let err = adapter.delete(&Key::Int(2)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_field_applies_status_change() {
        let adapter = leads();
        adapter
            .set_field(&Key::Int(1), &FieldPath::new("stage.id"), json!(3))
            .unwrap();
        let page = adapter
            .fetch_page(&ListParams::new().filter("stage.id", 3i64))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);

        let err = adapter
            .set_field(&Key::Int(99), &FieldPath::new("stage.id"), json!(3))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = adapter
            .set_field(&Key::Int(1), &FieldPath::new("missing.deep"), json!(3))
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn test_empty_collection_last_page_is_one() {
        let adapter = StaticAdapter::new("empty", Vec::new());
        let page = adapter.fetch_page(&ListParams::new()).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.meta.last_page, Some(1));
    }
}
