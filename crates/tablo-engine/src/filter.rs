use tablo_adapters::ListParams;
use tablo_types::{ClientPredicate, FilterSpec, QueryState, Record};

/// The adapter call a query state resolves to.
///
/// When `search` is set the runtime goes through the adapter's search
/// operation; adapters without a dedicated one fall back to the generic
/// listing with the query as a plain parameter (the trait default).
/// Server-side search and filtering keep transfer volume down on large
/// collections, while the client pass below covers fields the backend
/// cannot filter (computed, joined, or nested under relationships).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub search: Option<String>,
    pub params: ListParams,
}

impl FetchPlan {
    /// Build the plan for the current query state. Filters named in
    /// `server_keys` are folded into the fetch parameters and handled
    /// by the backend; everything else stays client-side.
    pub fn for_query(query: &QueryState, server_keys: &[String]) -> Self {
        let mut params = ListParams::new().page(query.page).per_page(query.per_page);
        for key in server_keys {
            if let Some(value) = query.active_filters.get(key) {
                params = params.filter(key.clone(), value.clone());
            }
        }
        let search = if query.search.is_empty() {
            None
        } else {
            Some(query.search.clone())
        };
        Self { search, params }
    }
}

/// Narrow a fetched page to the records the active filters keep.
///
/// Applied in order:
/// 1. generic filter matching: for every spec whose active value is
///    not the "all" sentinel (and that was not routed server-side),
///    keep records whose field coerced-equals the active value;
/// 2. the caller predicate.
///
/// **A caller predicate fully replaces step 1.** Declared filter specs
/// are computed into the query state either way, but the engine hands
/// them to the predicate instead of matching them itself; the predicate
/// must re-implement whatever filter semantics it needs.
pub fn apply_client_filters(
    items: Vec<Record>,
    query: &QueryState,
    specs: &[FilterSpec],
    predicate: Option<&ClientPredicate>,
    server_keys: &[String],
) -> Vec<Record> {
    match predicate {
        Some(predicate) => items
            .into_iter()
            .filter(|record| predicate(record, &query.search, &query.active_filters))
            .collect(),
        None => items
            .into_iter()
            .filter(|record| {
                specs.iter().all(|spec| {
                    let filter_key = spec.key.as_str();
                    if server_keys.iter().any(|k| k == filter_key) {
                        return true;
                    }
                    let active = query.active_filter(filter_key);
                    if active.is_all() {
                        return true;
                    }
                    record
                        .key_at(&spec.key)
                        .map(|k| k.coerced_eq(&active))
                        .unwrap_or(false)
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tablo_types::{Key, ViewMode};

    fn records() -> Vec<Record> {
        vec![
            Record::new(json!({"id": 1, "name": "Acme", "stage": {"id": 1}})).unwrap(),
            Record::new(json!({"id": 2, "name": "Globex", "stage": {"id": "2"}})).unwrap(),
            Record::new(json!({"id": 3, "name": "Initech", "stage": {"id": 2}})).unwrap(),
        ]
    }

    fn stage_filter() -> Vec<FilterSpec> {
        vec![
            FilterSpec::new("stage.id", "Stage")
                .option("New", 1i64)
                .option("Qualified", 2i64),
        ]
    }

    #[test]
    fn test_plan_without_search() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_page(3);
        let plan = FetchPlan::for_query(&query, &[]);
        assert_eq!(plan.search, None);
        assert_eq!(plan.params, ListParams::new().page(3).per_page(10));
    }

    #[test]
    fn test_plan_with_search_resets_to_first_page() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_page(3);
        query.set_search("acme");
        let plan = FetchPlan::for_query(&query, &[]);
        assert_eq!(plan.search.as_deref(), Some("acme"));
        assert_eq!(plan.params, ListParams::new().page(1).per_page(10));
    }

    #[test]
    fn test_plan_routes_named_filters_server_side() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_filter("owner.id", Key::Int(7));
        query.set_filter("stage.id", Key::Int(2));
        let plan = FetchPlan::for_query(&query, &["owner.id".to_string()]);
        assert_eq!(plan.params.filters.get("owner.id"), Some(&Key::Int(7)));
        assert!(!plan.params.filters.contains_key("stage.id"));
    }

    #[test]
    fn test_generic_matching_coerces_key_types() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_filter("stage.id", Key::Int(2));
        // Record 2 carries stage.id as the string "2", record 3 as the
        // number 2; both must match.
        let kept = apply_client_filters(records(), &query, &stage_filter(), None, &[]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id(), Key::Int(2));
        assert_eq!(kept[1].id(), Key::Int(3));
    }

    #[test]
    fn test_all_sentinel_keeps_everything() {
        let query = QueryState::new(ViewMode::Table);
        let kept = apply_client_filters(records(), &query, &stage_filter(), None, &[]);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_missing_field_is_dropped_by_active_filter() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_filter("stage.id", Key::Int(1));
        let mut items = records();
        items.push(Record::new(json!({"id": 4, "name": "No stage"})).unwrap());
        let kept = apply_client_filters(items, &query, &stage_filter(), None, &[]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id(), Key::Int(1));
    }

    #[test]
    fn test_predicate_replaces_generic_matching() {
        let mut query = QueryState::new(ViewMode::Table);
        // This declared filter would keep only stage 1...
        query.set_filter("stage.id", Key::Int(1));
        // ...but the predicate ignores filters entirely and keeps by name.
        let predicate: ClientPredicate =
            Arc::new(|record, _search, _filters| {
                record
                    .text(&"name".into())
                    .map(|n| n.contains('e'))
                    .unwrap_or(false)
            });
        let kept = apply_client_filters(
            records(),
            &query,
            &stage_filter(),
            Some(&predicate),
            &[],
        );
        // Acme, Globex, Initech all contain 'e': the declared filter did
        // not narrow anything.
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_server_routed_filter_not_reapplied() {
        let mut query = QueryState::new(ViewMode::Table);
        query.set_filter("stage.id", Key::Int(1));
        let server = vec!["stage.id".to_string()];
        // The backend already narrowed; the client pass must not drop
        // records that a naive re-match would reject.
        let kept = apply_client_filters(records(), &query, &stage_filter(), None, &server);
        assert_eq!(kept.len(), 3);
    }
}
