use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::presentation::view_models::{StatusBarViewModel, StatusLevel};

pub struct StatusBarView<'a> {
    model: &'a StatusBarViewModel,
}

impl<'a> StatusBarView<'a> {
    pub fn new(model: &'a StatusBarViewModel) -> Self {
        Self { model }
    }

    fn summary_line(&self) -> Line<'a> {
        let mut spans: Vec<Span> = Vec::new();

        if let Some(input) = &self.model.search_input {
            spans.push(Span::styled(
                format!("search: {}▌", input),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::styled(
                format!("[{}]", self.model.view_mode),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            if !self.model.search.is_empty() {
                spans.push(Span::raw(format!(" search:\"{}\"", self.model.search)));
            }
            if let Some(filter) = &self.model.filter_label {
                spans.push(Span::raw(format!(" filter:{}", filter)));
            }
            let mut pager = format!(" page {}", self.model.page);
            if let Some(last) = self.model.last_page {
                pager.push_str(&format!("/{}", last));
            }
            if let Some(total) = self.model.total {
                pager.push_str(&format!(" · {} total", total));
            }
            pager.push_str(&format!(" · {}/page", self.model.per_page));
            spans.push(Span::styled(pager, Style::default().fg(Color::DarkGray)));
        }

        let badge_color = match self.model.badge.level {
            StatusLevel::Success => Color::Green,
            StatusLevel::Info => Color::DarkGray,
            StatusLevel::Error => Color::Red,
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            self.model.badge.label.clone(),
            Style::default().fg(badge_color),
        ));

        if let Some(notice) = &self.model.notice {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }

        Line::from(spans)
    }

    fn hints_line(&self) -> Line<'a> {
        let hints = if self.model.search_input.is_some() {
            "Enter:apply  Esc:cancel"
        } else {
            "v:view  /:search  f:filter  [ ]:page  +:size  c:create  d:delete  r:refresh  q:quit"
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    }
}

impl Widget for StatusBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let summary = self.summary_line();
        let hints = self.hints_line();
        Paragraph::new(vec![summary, hints])
            .block(block)
            .render(area, buf);
    }
}
