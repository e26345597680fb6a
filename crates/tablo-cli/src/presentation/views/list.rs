use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::presentation::view_models::{CardViewModel, CollectionViewModel};

/// Single-column card stack. Shares card projection with the grid;
/// the two differ only in container layout.
pub struct ListView<'a> {
    model: &'a CollectionViewModel,
    selected: Option<usize>,
}

impl<'a> ListView<'a> {
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

pub(super) fn card_height(card: &CardViewModel) -> u16 {
    // Borders plus up to three body lines.
    2 + (card.lines.len().min(3).max(1)) as u16
}

pub(super) fn render_card(
    card: &CardViewModel,
    selected: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut block = Block::default()
        .title(card.title.clone())
        .borders(Borders::ALL);
    if selected {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
    }
    let lines: Vec<Line> = card
        .lines
        .iter()
        .take(3)
        .map(|line| Line::from(line.clone()))
        .collect();
    Paragraph::new(lines).block(block).render(area, buf);
}

impl Widget for ListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!("{} · list", self.model.endpoint))
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

        let mut y = inner.y;
        for (index, card) in self.model.cards.iter().enumerate() {
            let height = card_height(card);
            if y + height > inner.y + inner.height {
                break;
            }
            let card_area = Rect::new(inner.x, y, inner.width, height);
            render_card(card, self.selected == Some(index), card_area, buf);
            y += height;
        }
    }
}
