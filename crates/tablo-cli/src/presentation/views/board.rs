use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use tablo_engine::DropTarget;
use tablo_types::Key;

use crate::presentation::view_models::{BoardViewModel, CardViewModel};

use super::list::card_height;

/// Geometry of the last board render: which screen cells belong to
/// which column container and which card. The pointer path resolves
/// drops by looking positions up here; the result feeds the same
/// `resolve_drop_target` the keyboard path uses.
#[derive(Debug, Clone, Default)]
pub struct BoardLayout {
    pub columns: Vec<(Rect, Key)>,
    pub cards: Vec<(Rect, Key)>,
}

impl BoardLayout {
    pub fn card_at(&self, x: u16, y: u16) -> Option<&Key> {
        self.cards
            .iter()
            .find(|(rect, _)| contains(rect, x, y))
            .map(|(_, id)| id)
    }

    /// Drop target under a screen position: a card wins over its
    /// column container; outside both there is no target.
    pub fn target_at(&self, x: u16, y: u16) -> Option<DropTarget> {
        if let Some(id) = self.card_at(x, y) {
            return Some(DropTarget::Card(id.clone()));
        }
        self.columns
            .iter()
            .find(|(rect, _)| contains(rect, x, y))
            .map(|(_, id)| DropTarget::Column(id.clone()))
    }
}

fn contains(rect: &Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Kanban board: one bordered lane per declared column, cards stacked
/// inside, the dragged card dimmed in place.
pub struct BoardView<'a> {
    model: &'a BoardViewModel,
    focus: Option<(usize, usize)>,
}

impl<'a> BoardView<'a> {
    pub fn new(model: &'a BoardViewModel) -> Self {
        Self { model, focus: None }
    }

    pub fn focus(mut self, focus: Option<(usize, usize)>) -> Self {
        self.focus = focus;
        self
    }

    /// Compute the column and card rects for `area`. Render and
    /// hit-testing share this single geometry.
    pub fn layout(&self, area: Rect) -> BoardLayout {
        let mut layout = BoardLayout::default();
        if self.model.columns.is_empty() {
            return layout;
        }
        let count = self.model.columns.len();
        let constraints = vec![Constraint::Ratio(1, count as u32); count];
        let lanes = Layout::horizontal(constraints).split(area);

        for (lane, column) in lanes.iter().zip(self.model.columns.iter()) {
            layout.columns.push((*lane, column.id.clone()));
            let inner = Block::default().borders(Borders::ALL).inner(*lane);
            let mut y = inner.y;
            for card in &column.cards {
                let height = card_height(card);
                if y + height > inner.y + inner.height {
                    break;
                }
                layout
                    .cards
                    .push((Rect::new(inner.x, y, inner.width, height), card.id.clone()));
                y += height;
            }
        }
        layout
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout(area);

        for (index, ((lane, _), column)) in layout
            .columns
            .iter()
            .zip(self.model.columns.iter())
            .enumerate()
        {
            let accent = column
                .color
                .as_deref()
                .map(color_from_name)
                .unwrap_or(Color::DarkGray);
            let block = Block::default()
                .title(format!("{} ({})", column.label, column.count))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent));
            block.render(*lane, buf);

            let inner = Block::default().borders(Borders::ALL).inner(*lane);
            let mut y = inner.y;
            for (card_index, card) in column.cards.iter().enumerate() {
                let height = card_height(card);
                if y + height > inner.y + inner.height {
                    break;
                }
                let card_area = Rect::new(inner.x, y, inner.width, height);
                render_board_card(
                    card,
                    self.model.dragging.as_ref() == Some(&card.id),
                    self.focus == Some((index, card_index)),
                    card_area,
                    buf,
                );
                y += height;
            }
        }
    }
}

fn render_board_card(
    card: &CardViewModel,
    dragging: bool,
    focused: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut style = Style::default();
    if dragging {
        // The lifted card dims in place; the overlay copy follows the
        // pointer.
        style = style.add_modifier(Modifier::DIM);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .title(card.title.clone())
        .borders(Borders::ALL)
        .style(style);
    let lines: Vec<Line> = card
        .lines
        .iter()
        .take(3)
        .map(|line| Line::from(line.clone()))
        .collect();
    Paragraph::new(lines).block(block).render(area, buf);
}

/// Floating copy of the dragged card, rendered last at the pointer
/// position.
pub struct DragOverlayView<'a> {
    card: &'a CardViewModel,
}

impl<'a> DragOverlayView<'a> {
    pub fn new(card: &'a CardViewModel) -> Self {
        Self { card }
    }
}

impl Widget for DragOverlayView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(self.card.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().add_modifier(Modifier::BOLD));
        Paragraph::new("").block(block).render(area, buf);
    }
}

pub fn color_from_name(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "white" => Color::White,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::view_models::BoardColumnViewModel;
    use ratatui::{Terminal, backend::TestBackend};

    fn card(id: i64, title: &str) -> CardViewModel {
        CardViewModel {
            id: Key::Int(id),
            title: title.to_string(),
            lines: vec![],
        }
    }

    fn model() -> BoardViewModel {
        BoardViewModel {
            columns: vec![
                BoardColumnViewModel {
                    id: Key::Int(1),
                    label: "New".to_string(),
                    color: Some("cyan".to_string()),
                    count: 2,
                    cards: vec![card(10, "Acme"), card(11, "Globex")],
                },
                BoardColumnViewModel {
                    id: Key::Int(2),
                    label: "Won".to_string(),
                    color: None,
                    count: 0,
                    cards: vec![],
                },
            ],
            dragging: None,
            total: 2,
            loading: false,
            error: None,
        }
    }

    #[test]
    fn test_render_shows_column_titles_and_cards() {
        let model = model();
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(BoardView::new(&model), f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("New (2)"));
        assert!(text.contains("Won (0)"));
        assert!(text.contains("Acme"));
        assert!(text.contains("Globex"));
    }

    #[test]
    fn test_hit_testing_resolves_cards_then_columns() {
        let model = model();
        let view = BoardView::new(&model);
        let layout = view.layout(Rect::new(0, 0, 60, 12));

        // A point inside the first card resolves to that card.
        let (card_rect, card_id) = layout.cards[0].clone();
        assert_eq!(
            layout.target_at(card_rect.x + 1, card_rect.y + 1),
            Some(DropTarget::Card(card_id))
        );

        // A point inside the empty second lane resolves to the column.
        let (lane, column_id) = layout.columns[1].clone();
        assert_eq!(
            layout.target_at(lane.x + 2, lane.y + 2),
            Some(DropTarget::Column(column_id))
        );

        // Outside every lane: no target.
        assert_eq!(layout.target_at(5, 20), None);
    }
}
