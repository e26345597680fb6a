use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::presentation::view_models::CollectionViewModel;

use super::list::{card_height, render_card};

/// Minimum card width before the grid drops to fewer columns.
const MIN_CARD_WIDTH: u16 = 26;

/// Multi-column card wrap. Identical card bodies to the list view,
/// laid out row-major across as many columns as the width allows.
pub struct GridView<'a> {
    model: &'a CollectionViewModel,
    selected: Option<usize>,
}

impl<'a> GridView<'a> {
    pub fn new(model: &'a CollectionViewModel) -> Self {
        Self {
            model,
            selected: None,
        }
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!("{} · grid", self.model.endpoint))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.model.loading && self.model.cards.is_empty() {
            Paragraph::new("Loading...").render(inner, buf);
            return;
        }
        if self.model.cards.is_empty() {
            Paragraph::new("No results").render(inner, buf);
            return;
        }

        let columns = (inner.width / MIN_CARD_WIDTH).max(1) as usize;
        let constraints = vec![Constraint::Ratio(1, columns as u32); columns];

        let mut y = inner.y;
        for (row_index, chunk) in self.model.cards.chunks(columns).enumerate() {
            let height = chunk.iter().map(card_height).max().unwrap_or(3);
            if y + height > inner.y + inner.height {
                break;
            }
            let row_area = Rect::new(inner.x, y, inner.width, height);
            let cells = Layout::horizontal(constraints.clone()).split(row_area);
            for (col_index, card) in chunk.iter().enumerate() {
                let index = row_index * columns + col_index;
                render_card(card, self.selected == Some(index), cells[col_index], buf);
            }
            y += height;
        }
    }
}
