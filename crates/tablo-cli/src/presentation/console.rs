use anyhow::Result;

use super::view_models::{BoardViewModel, CollectionViewModel};

/// Aligned text rendering of a collection, for pipes and scripts.
pub fn render_collection_plain(vm: &CollectionViewModel) -> String {
    let mut out = String::new();

    if vm.loading && vm.rows.is_empty() {
        out.push_str("Loading...\n");
        return out;
    }

    let mut widths: Vec<usize> = vm.columns.iter().map(|c| c.label.len()).collect();
    for row in &vm.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header: Vec<String> = vm
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c.label, width = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    if vm.rows.is_empty() {
        out.push_str("(no results)\n");
    }
    for row in &vm.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&pager_line(vm));
    out.push('\n');
    out
}

fn pager_line(vm: &CollectionViewModel) -> String {
    let mut line = format!("page {}", vm.pager.page);
    if let Some(last) = vm.pager.last_page {
        line.push_str(&format!("/{}", last));
    }
    if let Some(total) = vm.pager.total {
        line.push_str(&format!(" · {} total", total));
    }
    if let Some(error) = &vm.error {
        line.push_str(&format!(" · error: {}", error));
    }
    line
}

/// Text rendering of the kanban board: one section per column.
pub fn render_board_plain(vm: &BoardViewModel) -> String {
    let mut out = String::new();
    for column in &vm.columns {
        out.push_str(&format!("{} ({})\n", column.label, column.count));
        for card in &column.cards {
            out.push_str(&format!("  - {}\n", card.title));
        }
    }
    out.push_str(&format!("\n{} records\n", vm.total));
    out
}

/// The complete view model as JSON: the machine-readable API surface.
/// Always the full collection model, regardless of view mode.
pub fn render_collection_json(vm: &CollectionViewModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(vm)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::view_models::{
        CardViewModel, ColumnHeader, PagerViewModel, RowAction, RowViewModel, StatusBadge,
    };
    use tablo_types::{Key, ViewMode};

    fn vm() -> CollectionViewModel {
        CollectionViewModel {
            endpoint: "leads".to_string(),
            view_mode: ViewMode::Table,
            search: String::new(),
            columns: vec![
                ColumnHeader {
                    key: "name".to_string(),
                    label: "Name".to_string(),
                    sortable: true,
                    sorted: None,
                    width: None,
                },
                ColumnHeader {
                    key: "value".to_string(),
                    label: "Value".to_string(),
                    sortable: false,
                    sorted: None,
                    width: None,
                },
            ],
            rows: vec![RowViewModel {
                id: Key::Int(1),
                cells: vec!["Acme Corporation".to_string(), "1200".to_string()],
                actions: vec![RowAction::View, RowAction::Delete],
            }],
            cards: vec![CardViewModel {
                id: Key::Int(1),
                title: "Acme Corporation".to_string(),
                lines: vec![],
            }],
            pager: PagerViewModel {
                page: 1,
                last_page: Some(3),
                total: Some(25),
                per_page: 10,
            },
            loading: false,
            error: None,
            badge: StatusBadge::success("1 shown · 25 total"),
        }
    }

    #[test]
    fn test_plain_alignment_and_pager() {
        let text = render_collection_plain(&vm());
        assert!(text.contains("Name              Value"));
        assert!(text.contains("Acme Corporation  1200"));
        assert!(text.contains("page 1/3 · 25 total"));
    }

    #[test]
    fn test_plain_empty_result() {
        let mut model = vm();
        model.rows.clear();
        let text = render_collection_plain(&model);
        assert!(text.contains("(no results)"));
    }

    #[test]
    fn test_json_is_parseable_and_complete() {
        let text = render_collection_json(&vm()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["endpoint"], "leads");
        assert_eq!(value["rows"][0]["cells"][0], "Acme Corporation");
        assert_eq!(value["pager"]["total"], 25);
        assert_eq!(value["view_mode"], "table");
    }
}
