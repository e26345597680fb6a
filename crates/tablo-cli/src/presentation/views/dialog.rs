use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use tablo_runtime::DialogState;
use tablo_types::Record;

/// Modal overlay for the active dialog. Create/edit bodies are stubs
/// here; real forms come from the embedding application; this view
/// only owns the transient dialog chrome and the delete confirmation.
pub struct DialogView<'a> {
    dialog: &'a DialogState,
}

impl<'a> DialogView<'a> {
    pub fn new(dialog: &'a DialogState) -> Self {
        Self { dialog }
    }

    fn body(&self) -> Option<(String, Vec<Line<'a>>)> {
        match self.dialog {
            DialogState::Closed => None,
            DialogState::Create => Some((
                "Create".to_string(),
                vec![
                    Line::from("New record"),
                    Line::from(""),
                    hint_line("[Enter] submit · [Esc] cancel"),
                ],
            )),
            DialogState::Edit(record) => Some((
                format!("Edit {}", record.id()),
                record_lines(record, "[Enter] submit · [Esc] cancel"),
            )),
            DialogState::View(record) => Some((
                format!("View {}", record.id()),
                record_lines(record, "[Esc] close"),
            )),
            DialogState::ConfirmDelete(record) => Some((
                "Confirm deletion".to_string(),
                vec![
                    Line::from(format!("Delete record {}?", record.id())),
                    Line::from(""),
                    hint_line("[y] delete · [n] cancel"),
                ],
            )),
        }
    }
}

fn record_lines(record: &Record, hint: &'static str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(object) = record.value().as_object() {
        for (key, value) in object {
            lines.push(Line::from(format!("{}: {}", key, value)));
        }
    }
    lines.push(Line::from(""));
    lines.push(hint_line(hint));
    lines
}

fn hint_line(hint: &'static str) -> Line<'static> {
    Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
}

/// Centered sub-rectangle for modal rendering.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for DialogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((title, lines)) = self.body() else {
            return;
        };
        let height = (lines.len() as u16 + 2).min(area.height);
        let modal = centered(area, area.width.saturating_sub(8).clamp(24, 60), height);
        Clear.render(modal, buf);
        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL);
        Paragraph::new(lines).block(block).render(modal, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    fn rendered(dialog: &DialogState) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(DialogView::new(dialog), f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_confirm_delete_prompt() {
        let record = Record::new(json!({"id": 7, "name": "Acme"})).unwrap();
        let text = rendered(&DialogState::ConfirmDelete(record));
        assert!(text.contains("Confirm deletion"));
        assert!(text.contains("Delete record 7?"));
    }

    #[test]
    fn test_view_dialog_shows_fields() {
        let record = Record::new(json!({"id": 7, "name": "Acme"})).unwrap();
        let text = rendered(&DialogState::View(record));
        assert!(text.contains("View 7"));
        assert!(text.contains("name"));
    }

    #[test]
    fn test_closed_renders_nothing() {
        let text = rendered(&DialogState::Closed);
        assert!(!text.contains("Create"));
    }
}
