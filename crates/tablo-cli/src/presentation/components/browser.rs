use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use tablo_adapters::ResourceAdapter;
use tablo_engine::{DropOutcome, partition};
use tablo_runtime::{Browser, DialogState, RecordingNotifier};
use tablo_types::{Key, Record, ViewMode};

use crate::presentation::presenters::{present_board, present_collection};
use crate::presentation::view_models::StatusBarViewModel;
use crate::presentation::views::{
    BoardLayout, BoardView, DialogView, DragOverlayView, GridView, ListView, StatusBarView,
    TableView,
};

/// Interactive browser screen: owns selection, board focus, the search
/// input buffer, and the last render's hit geometry. All data state
/// lives in the [`Browser`]; this component only translates input.
pub struct BrowserComponent<A> {
    browser: Browser<A>,
    notifier: Arc<RecordingNotifier>,
    selected: usize,
    focus_col: usize,
    focus_row: usize,
    search_input: Option<String>,
    board_layout: BoardLayout,
    quit: bool,
}

impl<A: ResourceAdapter + 'static> BrowserComponent<A> {
    pub fn new(browser: Browser<A>, notifier: Arc<RecordingNotifier>) -> Self {
        Self {
            browser,
            notifier,
            selected: 0,
            focus_col: 0,
            focus_row: 0,
            search_input: None,
            board_layout: BoardLayout::default(),
            quit: false,
        }
    }

    pub fn browser(&self) -> &Browser<A> {
        &self.browser
    }

    pub fn sync(&self) {
        self.browser.sync();
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<tablo_runtime::CacheSnapshot> {
        self.browser.subscribe()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    // --- Input ------------------------------------------------------------

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        if self.search_input.is_some() {
            self.handle_search_key(key);
            return Ok(());
        }

        if self.browser.dialog().is_open() {
            self.handle_dialog_key(key).await;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('/') => {
                self.search_input = Some(self.browser.query().search.clone());
            }
            KeyCode::Char('v') => self.browser.cycle_view_mode(),
            KeyCode::Char('r') => self.browser.refresh(),
            KeyCode::Char(']') => self.browser.next_page(),
            KeyCode::Char('[') => self.browser.prev_page(),
            KeyCode::Char('+') => self.browser.cycle_per_page(),
            KeyCode::Char('c') => self.browser.open_create(),
            KeyCode::Char('f') => self.cycle_first_filter(),
            KeyCode::Char(c @ '1'..='9') if self.browser.view_mode() != ViewMode::Board => {
                let index = (c as usize) - ('1' as usize);
                if let Some(field) = self.browser.config().fields.get(index) {
                    let key = field.key.clone();
                    self.browser.toggle_sort(&key);
                }
            }
            _ => {
                if self.browser.view_mode() == ViewMode::Board {
                    self.handle_board_key(key).await;
                } else {
                    self.handle_flat_key(key).await;
                }
            }
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let Some(input) = &mut self.search_input else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.search_input = None,
            KeyCode::Enter => {
                let text = self.search_input.take().unwrap_or_default();
                self.browser.set_search(text);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) {
        match self.browser.dialog().clone() {
            DialogState::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') => self.browser.confirm_delete().await,
                KeyCode::Char('n') | KeyCode::Esc => self.browser.cancel_delete(),
                _ => {}
            },
            DialogState::Create | DialogState::Edit(_) => match key.code {
                // The form itself is the embedding app's; Enter stands
                // in for its success report.
                KeyCode::Enter => self.browser.submit_succeeded(),
                KeyCode::Esc => self.browser.close_dialog(),
                _ => {}
            },
            DialogState::View(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.browser.close_dialog();
                }
            }
            DialogState::Closed => {}
        }
    }

    async fn handle_flat_key(&mut self, key: KeyEvent) {
        let records = self.browser.visible();
        match key.code {
            KeyCode::Down => {
                if !records.is_empty() {
                    self.selected = (self.selected + 1).min(records.len() - 1);
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(record) = records.get(self.selected) {
                    self.browser.open_view(record.clone());
                }
            }
            KeyCode::Char('e') => {
                if self.browser.config().has_edit_form
                    && let Some(record) = records.get(self.selected)
                {
                    self.browser.open_edit(record.clone());
                }
            }
            KeyCode::Char('d') => {
                if let Some(record) = records.get(self.selected) {
                    self.browser.stage_delete(record.clone());
                }
            }
            _ => {}
        }
    }

    async fn handle_board_key(&mut self, key: KeyEvent) {
        let column_count = self
            .browser
            .config()
            .board
            .as_ref()
            .map(|b| b.columns.len())
            .unwrap_or(0);
        if column_count == 0 {
            return;
        }

        match key.code {
            KeyCode::Left => {
                self.focus_col = self.focus_col.saturating_sub(1);
                self.focus_row = 0;
            }
            KeyCode::Right => {
                self.focus_col = (self.focus_col + 1).min(column_count - 1);
                self.focus_row = 0;
            }
            KeyCode::Down => self.focus_row += 1,
            KeyCode::Up => self.focus_row = self.focus_row.saturating_sub(1),
            KeyCode::Char(' ') => {
                if self.browser.drag().is_idle() {
                    if let Some(record) = self.focused_card() {
                        self.browser.pick_up(record.id());
                    }
                } else {
                    let target = self.focused_column_target();
                    self.browser.drop_on(target).await;
                }
            }
            KeyCode::Esc => self.browser.cancel_drag(),
            KeyCode::Enter => {
                if let Some(record) = self.focused_card() {
                    self.browser.open_view(record.clone());
                }
            }
            KeyCode::Char('d') => {
                if let Some(record) = self.focused_card() {
                    self.browser.stage_delete(record.clone());
                }
            }
            _ => {}
        }
        self.clamp_board_focus();
    }

    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.browser.view_mode() != ViewMode::Board {
            return Ok(());
        }
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.board_layout.card_at(position.0, position.1) {
                    self.browser.drag_press(id.clone(), position);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.browser.drag_move(position),
            MouseEventKind::Up(MouseButton::Left) => {
                let target = self.board_layout.target_at(position.0, position.1);
                if let DropOutcome::Click(id) = self.browser.drop_on(target).await {
                    self.focus_card_by_id(&id);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // --- Focus helpers ----------------------------------------------------

    fn focused_card(&self) -> Option<Record> {
        let board = self.browser.config().board.clone()?;
        let records = self.browser.visible();
        let buckets = partition(&records, &board);
        buckets
            .get(self.focus_col)?
            .get(self.focus_row)
            .map(|record| (*record).clone())
    }

    fn focused_column_target(&self) -> Option<tablo_engine::DropTarget> {
        let board = self.browser.config().board.as_ref()?;
        board
            .columns
            .get(self.focus_col)
            .map(|column| tablo_engine::DropTarget::Column(column.id.clone()))
    }

    fn focus_card_by_id(&mut self, id: &Key) {
        let Some(board) = self.browser.config().board.clone() else {
            return;
        };
        let records = self.browser.visible();
        let buckets = partition(&records, &board);
        for (col, bucket) in buckets.iter().enumerate() {
            if let Some(row) = bucket.iter().position(|r| r.id().coerced_eq(id)) {
                self.focus_col = col;
                self.focus_row = row;
                return;
            }
        }
    }

    fn clamp_board_focus(&mut self) {
        let Some(board) = self.browser.config().board.clone() else {
            return;
        };
        let records = self.browser.visible();
        let buckets = partition(&records, &board);
        if let Some(bucket) = buckets.get(self.focus_col) {
            self.focus_row = self.focus_row.min(bucket.len().saturating_sub(1));
        }
    }

    fn cycle_first_filter(&mut self) {
        let Some(spec) = self.browser.config().filters.first().cloned() else {
            return;
        };
        let filter_key = spec.key.as_str().to_string();
        let active = self.browser.query().active_filter(&filter_key);
        let next = if active.is_all() {
            spec.options.first().map(|o| o.value.clone())
        } else {
            let position = spec
                .options
                .iter()
                .position(|o| o.value.coerced_eq(&active));
            match position {
                Some(i) if i + 1 < spec.options.len() => Some(spec.options[i + 1].value.clone()),
                _ => None, // wrap back to "all"
            }
        };
        self.browser
            .set_filter(filter_key, next.unwrap_or_else(Key::all));
    }

    // --- Render -----------------------------------------------------------

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(f.area());
        let records = self.browser.visible();
        let snapshot = self.browser.snapshot();

        if !records.is_empty() {
            self.selected = self.selected.min(records.len() - 1);
        } else {
            self.selected = 0;
        }

        let collection = present_collection(
            self.browser.endpoint(),
            self.browser.query(),
            self.browser.sort(),
            &self.browser.config().fields,
            &records,
            &snapshot,
            self.browser.config().has_edit_form,
            self.browser.config().card_render.as_ref(),
        );

        match self.browser.view_mode() {
            ViewMode::Table => {
                f.render_widget(TableView::new(&collection), chunks[0]);
                self.board_layout = BoardLayout::default();
            }
            ViewMode::List => {
                f.render_widget(
                    ListView::new(&collection).selected(Some(self.selected)),
                    chunks[0],
                );
                self.board_layout = BoardLayout::default();
            }
            ViewMode::Grid => {
                f.render_widget(
                    GridView::new(&collection).selected(Some(self.selected)),
                    chunks[0],
                );
                self.board_layout = BoardLayout::default();
            }
            ViewMode::Board => {
                if let Some(board_spec) = self.browser.config().board.clone() {
                    let dragging = self.browser.drag().dragging().map(|(id, _)| id.clone());
                    let board = present_board(
                        &board_spec,
                        &records,
                        dragging.as_ref(),
                        &snapshot,
                        &self.browser.config().fields,
                        self.browser.config().card_render.as_ref(),
                    );
                    let view =
                        BoardView::new(&board).focus(Some((self.focus_col, self.focus_row)));
                    self.board_layout = view.layout(chunks[0]);
                    f.render_widget(BoardView::new(&board).focus(Some((self.focus_col, self.focus_row))), chunks[0]);

                    if let Some((id, at)) = self.browser.drag().dragging() {
                        let overlay_card = board
                            .columns
                            .iter()
                            .flat_map(|column| column.cards.iter())
                            .find(|card| card.id.coerced_eq(id));
                        if let Some(card) = overlay_card {
                            let area = f.area();
                            let width = 22u16.min(area.width);
                            let height = 3u16.min(area.height);
                            let x = at.0.min(area.width.saturating_sub(width));
                            let y = at.1.min(area.height.saturating_sub(height));
                            f.render_widget(
                                DragOverlayView::new(card),
                                Rect::new(x, y, width, height),
                            );
                        }
                    }
                } else {
                    f.render_widget(TableView::new(&collection), chunks[0]);
                }
            }
        }

        let status = StatusBarViewModel {
            view_mode: self.browser.view_mode(),
            badge: collection.badge.clone(),
            page: collection.pager.page,
            last_page: collection.pager.last_page,
            total: collection.pager.total,
            per_page: collection.pager.per_page,
            search: collection.search.clone(),
            search_input: self.search_input.clone(),
            filter_label: self.active_filter_label(),
            notice: self.notifier.last().map(|(_, message)| message),
        };
        f.render_widget(StatusBarView::new(&status), chunks[1]);

        f.render_widget(DialogView::new(self.browser.dialog()), f.area());
    }

    fn active_filter_label(&self) -> Option<String> {
        let spec = self.browser.config().filters.first()?;
        let active = self.browser.query().active_filter(spec.key.as_str());
        if active.is_all() {
            return None;
        }
        let label = spec
            .options
            .iter()
            .find(|o| o.value.coerced_eq(&active))
            .map(|o| o.label.clone())
            .unwrap_or_else(|| active.to_string());
        Some(format!("{}={}", spec.label, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tablo_runtime::{BrowserConfig, NoticeLevel, StatusHandler};
    use tablo_testing::{MockAdapter, leads_page, sample_leads};
    use tablo_types::{ColumnSpec, FieldSpec};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name").sortable(),
            FieldSpec::new("value", "Value").sortable(),
        ]
    }

    fn board_spec() -> tablo_engine::BoardSpec {
        tablo_engine::BoardSpec::new(
            vec![
                ColumnSpec::new(1i64, "New"),
                ColumnSpec::new(2i64, "Qualified"),
                ColumnSpec::new(3i64, "Won"),
            ],
            "stage.id",
        )
    }

    async fn settled_component(
        config: BrowserConfig,
        route: &str,
    ) -> (Arc<MockAdapter>, Arc<RecordingNotifier>, BrowserComponent<MockAdapter>) {
        let adapter = Arc::new(MockAdapter::new("leads"));
        adapter.set_default_page(leads_page(sample_leads()));
        let notifier = Arc::new(RecordingNotifier::new());
        let browser = Browser::new(adapter.clone(), config, route, notifier.clone());
        let component = BrowserComponent::new(browser, notifier.clone());
        component.sync();
        let mut rx = component.subscribe();
        while component.browser().snapshot().loading {
            rx.changed().await.unwrap();
        }
        (adapter, notifier, component)
    }

    #[tokio::test]
    async fn test_view_cycling_key() {
        let (_, _, mut component) = settled_component(BrowserConfig::new(fields()), "").await;
        assert_eq!(component.browser().view_mode(), ViewMode::Table);
        component.handle_key(key(KeyCode::Char('v'))).await.unwrap();
        assert_eq!(component.browser().view_mode(), ViewMode::List);
        assert_eq!(component.browser().route(), "view=list");
    }

    #[tokio::test]
    async fn test_search_input_flow() {
        let (adapter, _, mut component) =
            settled_component(BrowserConfig::new(fields()), "").await;
        component.handle_key(key(KeyCode::Char('/'))).await.unwrap();
        for c in "acme".chars() {
            component.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        component.handle_key(key(KeyCode::Enter)).await.unwrap();

        // set_search spawns the refetch; drive it to completion before
        // inspecting the adapter, as settled_component does on startup.
        let mut rx = component.subscribe();
        while component.browser().snapshot().loading {
            rx.changed().await.unwrap();
        }

        assert_eq!(component.browser().query().search, "acme");
        let last = adapter.fetch_calls().pop().unwrap();
        assert_eq!(last.search.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_delete_flow_failure_keeps_rows() {
        let (adapter, notifier, mut component) =
            settled_component(BrowserConfig::new(fields()), "").await;
        adapter.fail_deletes("409 conflict");

        component.handle_key(key(KeyCode::Char('d'))).await.unwrap();
        assert!(matches!(
            component.browser().dialog(),
            DialogState::ConfirmDelete(_)
        ));
        component.handle_key(key(KeyCode::Char('y'))).await.unwrap();

        assert_eq!(notifier.last().unwrap().0, NoticeLevel::Error);
        assert_eq!(component.browser().visible().len(), 7);
    }

    #[tokio::test]
    async fn test_keyboard_board_move() {
        let moves: Arc<Mutex<Vec<tablo_engine::StatusChange>>> =
            Arc::new(Mutex::new(Vec::new()));
        let handler: StatusHandler = {
            let moves = moves.clone();
            Arc::new(move |change| {
                let moves = moves.clone();
                Box::pin(async move {
                    moves.lock().unwrap().push(change);
                    Ok(())
                })
            })
        };
        let config = BrowserConfig::new(fields())
            .board(board_spec())
            .on_status_change(handler);
        let (_, _, mut component) = settled_component(config, "view=board").await;

        // Pick up the first card in column 0, move focus to column 2, drop.
        component.handle_key(key(KeyCode::Char(' '))).await.unwrap();
        component.handle_key(key(KeyCode::Right)).await.unwrap();
        component.handle_key(key(KeyCode::Right)).await.unwrap();
        component.handle_key(key(KeyCode::Char(' '))).await.unwrap();

        let recorded = moves.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].id, Key::Int(10));
        assert_eq!(recorded[0].to, Key::Int(3));
    }

    #[tokio::test]
    async fn test_filter_cycling_key() {
        let filters = vec![
            tablo_types::FilterSpec::new("stage.id", "Stage")
                .option("New", 1i64)
                .option("Won", 3i64),
        ];
        let config = BrowserConfig::new(fields()).filters(filters);
        let (_, _, mut component) = settled_component(config, "").await;

        component.handle_key(key(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(
            component.browser().query().active_filter("stage.id"),
            Key::Int(1)
        );
        assert_eq!(component.browser().visible().len(), 2);

        component.handle_key(key(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(
            component.browser().query().active_filter("stage.id"),
            Key::Int(3)
        );

        // One more press wraps back to "all".
        component.handle_key(key(KeyCode::Char('f'))).await.unwrap();
        assert!(component.browser().query().active_filter("stage.id").is_all());
        assert_eq!(component.browser().visible().len(), 7);
    }

    #[tokio::test]
    async fn test_render_smoke_all_modes() {
        let config = BrowserConfig::new(fields()).board(board_spec());
        let (_, _, mut component) = settled_component(config, "").await;
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();

        for _ in 0..4 {
            terminal.draw(|f| component.render(f)).unwrap();
            component.handle_key(key(KeyCode::Char('v'))).await.unwrap();
        }
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        // Last drawn mode before the final cycle is the board.
        assert!(text.contains("New (3)"));
    }
}
