use tablo_engine::SortState;
use tablo_runtime::CacheSnapshot;
use tablo_types::{CardRender, FieldSpec, QueryState, Record};

use crate::presentation::view_models::{
    CardViewModel, CollectionViewModel, ColumnHeader, PagerViewModel, RowAction, RowViewModel,
    SortDirection, StatusBadge,
};

/// Project one collection screen into its view model.
pub fn present_collection(
    endpoint: &str,
    query: &QueryState,
    sort: &SortState,
    fields: &[FieldSpec],
    records: &[Record],
    snapshot: &CacheSnapshot,
    has_edit_form: bool,
    card_render: Option<&CardRender>,
) -> CollectionViewModel {
    let columns = fields
        .iter()
        .map(|field| ColumnHeader {
            key: field.key.as_str().to_string(),
            label: field.label.clone(),
            sortable: field.sortable,
            sorted: match &sort.key {
                Some(key) if key == &field.key => Some(if sort.descending {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }),
                _ => None,
            },
            width: field.width,
        })
        .collect();

    let mut actions = vec![RowAction::View];
    if has_edit_form {
        actions.push(RowAction::Edit);
    }
    actions.push(RowAction::Delete);

    let rows = records
        .iter()
        .map(|record| RowViewModel {
            id: record.id(),
            cells: fields.iter().map(|field| field.cell(record)).collect(),
            actions: actions.clone(),
        })
        .collect::<Vec<_>>();

    let cards = records
        .iter()
        .map(|record| build_card(record, fields, card_render))
        .collect();

    let pager = PagerViewModel {
        page: query.page,
        last_page: snapshot.data.as_ref().and_then(|p| p.meta.last_page),
        total: snapshot.data.as_ref().and_then(|p| p.meta.total),
        per_page: query.per_page,
    };

    let badge = if let Some(error) = &snapshot.error {
        StatusBadge::error(error.clone())
    } else if snapshot.loading && rows.is_empty() {
        StatusBadge::info("Loading...")
    } else if rows.is_empty() {
        StatusBadge::info("No results")
    } else {
        match pager.total {
            Some(total) => StatusBadge::success(format!("{} shown · {} total", rows.len(), total)),
            None => StatusBadge::success(format!("{} shown", rows.len())),
        }
    };

    CollectionViewModel {
        endpoint: endpoint.to_string(),
        view_mode: query.view_mode,
        search: query.search.clone(),
        columns,
        rows,
        cards,
        pager,
        loading: snapshot.loading,
        error: snapshot.error.clone(),
        badge,
    }
}

/// Card body for one record: the caller's renderer when present (first
/// line is the title), a generic field projection otherwise.
pub fn build_card(
    record: &Record,
    fields: &[FieldSpec],
    card_render: Option<&CardRender>,
) -> CardViewModel {
    if let Some(render) = card_render {
        let mut lines = render(record);
        let title = if lines.is_empty() {
            record.id().to_string()
        } else {
            lines.remove(0)
        };
        return CardViewModel {
            id: record.id(),
            title,
            lines,
        };
    }

    let mut cells = fields.iter().map(|field| (field, field.cell(record)));
    let title = cells
        .next()
        .map(|(_, cell)| cell)
        .filter(|cell| !cell.is_empty())
        .unwrap_or_else(|| record.id().to_string());
    let lines = cells
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(field, cell)| format!("{}: {}", field.label, cell))
        .collect();

    CardViewModel {
        id: record.id(),
        title,
        lines,
    }
}
