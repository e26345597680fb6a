use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::presentation::view_models::{CollectionViewModel, RowAction, SortDirection};

/// Row-table projection: one row per record, one cell per declared
/// field, a trailing actions cell.
pub struct TableView<'a> {
    model: &'a CollectionViewModel,
}

impl<'a> TableView<'a> {
    pub fn new(model: &'a CollectionViewModel) -> Self {
        Self { model }
    }

    fn header(&self) -> Row<'a> {
        let mut cells: Vec<Cell> = self
            .model
            .columns
            .iter()
            .map(|column| {
                let marker = match column.sorted {
                    Some(SortDirection::Asc) => " ▲",
                    Some(SortDirection::Desc) => " ▼",
                    None => "",
                };
                Cell::from(format!("{}{}", column.label, marker))
            })
            .collect();
        cells.push(Cell::from("Actions"));
        Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
    }

    fn widths(&self) -> Vec<Constraint> {
        let mut widths: Vec<Constraint> = self
            .model
            .columns
            .iter()
            .map(|column| match column.width {
                Some(width) => Constraint::Length(width),
                None => Constraint::Min(8),
            })
            .collect();
        widths.push(Constraint::Length(13));
        widths
    }
}

fn action_glyphs(actions: &[RowAction]) -> String {
    actions
        .iter()
        .map(|action| match action {
            RowAction::View => "view",
            RowAction::Edit => "edit",
            RowAction::Delete => "del",
        })
        .collect::<Vec<_>>()
        .join("·")
}

impl Widget for TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!("{} · table", self.model.endpoint))
            .borders(Borders::ALL);

        if self.model.loading && self.model.rows.is_empty() {
            // One placeholder spanning the layout, never partial rows.
            Paragraph::new("Loading...").block(block).render(area, buf);
            return;
        }
        if self.model.rows.is_empty() {
            Paragraph::new(Line::from("No results"))
                .block(block)
                .render(area, buf);
            return;
        }

        let rows: Vec<Row> = self
            .model
            .rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> =
                    row.cells.iter().map(|cell| Cell::from(cell.clone())).collect();
                cells.push(Cell::from(action_glyphs(&row.actions)));
                Row::new(cells)
            })
            .collect();

        Table::new(rows, self.widths())
            .header(self.header())
            .block(block)
            .render(area, buf);
    }
}
