use std::sync::Arc;

use futures::future::BoxFuture;

use tablo_adapters::ResourceAdapter;
use tablo_engine::{
    BoardSpec, DragGesture, DropOutcome, DropTarget, FetchPlan, SortState, StatusChange,
    apply_client_filters,
};
use tablo_types::{
    CardRender, ClientPredicate, DataMapper, FieldPath, FieldSpec, FilterSpec, Key, QueryState,
    Record, ViewMode,
};

use crate::cache::{CacheSnapshot, CollectionCache};
use crate::dialog::DialogState;
use crate::notify::{NoticeLevel, Notifier};

/// Authoritative status mutation for a kanban move. The browser awaits
/// the handler and invalidates the cache only on success, so the board
/// reflects exactly what the backend accepted.
pub type StatusHandler =
    Arc<dyn Fn(StatusChange) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Page-size steps the per-page control cycles through.
pub const PER_PAGE_STEPS: [u64; 4] = [10, 25, 50, 100];

/// Everything a caller declares about one resource collection.
#[derive(Clone)]
pub struct BrowserConfig {
    pub fields: Vec<FieldSpec>,
    pub filters: Vec<FilterSpec>,
    pub board: Option<BoardSpec>,
    /// Declared filters routed into the fetch parameters instead of the
    /// client pass.
    pub server_filter_keys: Vec<String>,
    /// Reshapes every fetched page before filtering and rendering.
    pub data_mapper: Option<DataMapper>,
    /// Fully replaces generic filter matching when present; see
    /// [`tablo_types::ClientPredicate`].
    pub client_predicate: Option<ClientPredicate>,
    pub card_render: Option<CardRender>,
    /// Whether an edit form is registered; controls the edit action's
    /// presence in the actions cell.
    pub has_edit_form: bool,
    pub on_status_change: Option<StatusHandler>,
}

impl BrowserConfig {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            filters: Vec::new(),
            board: None,
            server_filter_keys: Vec::new(),
            data_mapper: None,
            client_predicate: None,
            card_render: None,
            has_edit_form: false,
            on_status_change: None,
        }
    }

    pub fn filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }

    pub fn board(mut self, board: BoardSpec) -> Self {
        self.board = Some(board);
        self
    }

    pub fn server_filters(mut self, keys: Vec<String>) -> Self {
        self.server_filter_keys = keys;
        self
    }

    pub fn data_mapper(mut self, mapper: DataMapper) -> Self {
        self.data_mapper = Some(mapper);
        self
    }

    pub fn client_predicate(mut self, predicate: ClientPredicate) -> Self {
        self.client_predicate = Some(predicate);
        self
    }

    pub fn card_render(mut self, render: CardRender) -> Self {
        self.card_render = Some(render);
        self
    }

    pub fn with_edit_form(mut self) -> Self {
        self.has_edit_form = true;
        self
    }

    pub fn on_status_change(mut self, handler: StatusHandler) -> Self {
        self.on_status_change = Some(handler);
        self
    }
}

/// One resource collection browser: owns the query state, drives the
/// cache, and orchestrates dialogs, deletes, and board moves. Exactly
/// one browser owns a given query state; nothing here is shared across
/// simultaneously-rendered collections.
pub struct Browser<A> {
    config: BrowserConfig,
    query: QueryState,
    sort: SortState,
    dialog: DialogState,
    drag: DragGesture,
    cache: CollectionCache<A>,
    adapter: Arc<A>,
    notifier: Arc<dyn Notifier>,
    route: String,
}

impl<A: ResourceAdapter + 'static> Browser<A> {
    /// Build a browser. The view mode is read from the route query
    /// string (`view=board`); unknown or missing values mean the table.
    pub fn new(
        adapter: Arc<A>,
        config: BrowserConfig,
        route: &str,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let query = QueryState::new(ViewMode::from_query(route));
        let route = query.view_mode.patch_query(route);
        Self {
            cache: CollectionCache::new(adapter.clone()),
            adapter,
            config,
            query,
            sort: SortState::default(),
            dialog: DialogState::default(),
            drag: DragGesture::new(),
            notifier,
            route,
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.cache.endpoint()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn view_mode(&self) -> ViewMode {
        self.query.view_mode
    }

    /// The route query string with the current view mode patched in;
    /// the host applies this to its navigation state.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Start (or re-align) the fetch for the current query state.
    pub fn sync(&self) {
        let plan = FetchPlan::for_query(&self.query, &self.config.server_filter_keys);
        self.cache.ensure(&plan);
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<CacheSnapshot> {
        self.cache.subscribe()
    }

    pub fn refresh(&self) {
        self.cache.invalidate();
    }

    /// The filtered, sorted records of the current page: what every
    /// view renders. Re-derived from the latest fetch on each call;
    /// records are never patched in place.
    pub fn visible(&self) -> Vec<Record> {
        let Some(page) = self.cache.snapshot().data else {
            return Vec::new();
        };
        let items = match &self.config.data_mapper {
            Some(mapper) => mapper(page.data),
            None => page.data,
        };
        let mut items = apply_client_filters(
            items,
            &self.query,
            &self.config.filters,
            self.config.client_predicate.as_ref(),
            &self.config.server_filter_keys,
        );
        self.sort.apply(&mut items);
        items
    }

    // --- Query mutations -------------------------------------------------

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.set_search(text);
        self.sync();
    }

    pub fn set_filter(&mut self, filter_key: impl Into<String>, value: Key) {
        self.query.set_filter(filter_key, value);
        self.sync();
    }

    pub fn set_page(&mut self, page: u64) {
        self.query.set_page(page);
        self.sync();
    }

    pub fn next_page(&mut self) {
        let last = self.cache.snapshot().data.and_then(|p| p.meta.last_page);
        let next = self.query.page + 1;
        if last.map(|l| next <= l).unwrap_or(true) {
            self.query.set_page(next);
            self.sync();
        }
    }

    pub fn prev_page(&mut self) {
        if self.query.page > 1 {
            self.query.set_page(self.query.page - 1);
            self.sync();
        }
    }

    pub fn set_per_page(&mut self, per_page: u64) {
        self.query.set_per_page(per_page);
        self.sync();
    }

    pub fn cycle_per_page(&mut self) {
        let current = self.query.per_page;
        let next = PER_PAGE_STEPS
            .iter()
            .position(|&step| step == current)
            .map(|i| PER_PAGE_STEPS[(i + 1) % PER_PAGE_STEPS.len()])
            .unwrap_or(PER_PAGE_STEPS[0]);
        self.set_per_page(next);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.query.set_view_mode(mode);
        self.route = mode.patch_query(&self.route);
    }

    pub fn cycle_view_mode(&mut self) {
        self.set_view_mode(self.query.view_mode.next());
    }

    pub fn toggle_sort(&mut self, key: &FieldPath) {
        let sortable = self
            .config
            .fields
            .iter()
            .any(|field| field.sortable && &field.key == key);
        if sortable {
            self.sort.toggle(key);
        }
    }

    // --- Dialogs ---------------------------------------------------------

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn open_create(&mut self) {
        self.dialog = DialogState::Create;
    }

    pub fn open_edit(&mut self, record: Record) {
        self.dialog = DialogState::Edit(record);
    }

    pub fn open_view(&mut self, record: Record) {
        self.dialog = DialogState::View(record);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
    }

    /// The caller's form reported a successful create/edit. Close and
    /// invalidate; no client-side splicing, so server-computed fields
    /// (timestamps, totals, expansions) come back correct at the cost
    /// of one extra round trip.
    pub fn submit_succeeded(&mut self) {
        self.dialog = DialogState::Closed;
        self.notifier.notify(NoticeLevel::Success, "Saved");
        self.cache.invalidate();
    }

    // --- Delete flow ------------------------------------------------------

    pub fn stage_delete(&mut self, record: Record) {
        self.dialog = DialogState::ConfirmDelete(record);
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.dialog, DialogState::ConfirmDelete(_)) {
            self.dialog = DialogState::Closed;
        }
    }

    /// Confirm the staged deletion. On failure the staged state is
    /// cleared, a notification surfaces, and the list is left exactly
    /// as it was; rows are never optimistically removed.
    pub async fn confirm_delete(&mut self) {
        let DialogState::ConfirmDelete(record) = std::mem::take(&mut self.dialog) else {
            return;
        };
        let id = record.id();
        match self.adapter.delete(&id).await {
            Ok(()) => {
                self.notifier
                    .notify(NoticeLevel::Success, &format!("Deleted {}", id));
                self.cache.invalidate();
            }
            Err(err) => {
                self.notifier
                    .notify(NoticeLevel::Error, &format!("Delete failed: {}", err));
            }
        }
    }

    // --- Board drag lifecycle --------------------------------------------

    pub fn drag(&self) -> &DragGesture {
        &self.drag
    }

    pub fn drag_press(&mut self, id: Key, position: (u16, u16)) {
        self.drag.press(id, position);
    }

    pub fn drag_move(&mut self, position: (u16, u16)) {
        self.drag.move_to(position);
    }

    /// Keyboard pick-up; reaches the same drop resolution as pointer
    /// drags via [`Browser::drop_on`].
    pub fn pick_up(&mut self, id: Key) {
        self.drag.pick_up(id, (0, 0));
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Finish the active drag on `target`. A resolved move awaits the
    /// status handler, then invalidates so the next grouping pass
    /// reflects the backend's answer; a failed handler leaves the board
    /// untouched and surfaces a notification.
    pub async fn drop_on(&mut self, target: Option<DropTarget>) -> DropOutcome {
        let Some(board) = &self.config.board else {
            self.drag.cancel();
            return DropOutcome::NoOp;
        };
        let items = self.visible();
        let outcome = self.drag.release(target.as_ref(), board, &items);
        if let DropOutcome::Moved(change) = &outcome {
            match &self.config.on_status_change {
                Some(handler) => match handler(change.clone()).await {
                    Ok(()) => {
                        self.notifier
                            .notify(NoticeLevel::Success, &format!("Moved {}", change.id));
                        self.cache.invalidate();
                    }
                    Err(err) => {
                        self.notifier
                            .notify(NoticeLevel::Error, &format!("Move failed: {}", err));
                    }
                },
                None => {}
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tablo_adapters::ListParams;
    use tablo_engine::BoardSpec;
    use tablo_testing::{MockAdapter, leads_page, sample_leads};
    use tablo_types::ColumnSpec;

    use crate::notify::RecordingNotifier;

    fn board() -> BoardSpec {
        BoardSpec::new(
            vec![
                ColumnSpec::new(1i64, "New"),
                ColumnSpec::new(2i64, "Qualified"),
                ColumnSpec::new(3i64, "Won"),
            ],
            "stage.id",
        )
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name").sortable(),
            FieldSpec::new("value", "Value").sortable(),
        ]
    }

    struct World {
        adapter: Arc<MockAdapter>,
        notifier: Arc<RecordingNotifier>,
        browser: Browser<MockAdapter>,
    }

    fn world(config: BrowserConfig, route: &str) -> World {
        let adapter = Arc::new(MockAdapter::new("leads"));
        adapter.set_default_page(leads_page(sample_leads()));
        let notifier = Arc::new(RecordingNotifier::new());
        let browser = Browser::new(adapter.clone(), config, route, notifier.clone());
        World {
            adapter,
            notifier,
            browser,
        }
    }

    async fn settle(browser: &Browser<MockAdapter>) {
        let mut rx = browser.subscribe();
        loop {
            if !browser.snapshot().loading && browser.snapshot().key.is_some() {
                return;
            }
            rx.changed().await.expect("cache dropped");
        }
    }

    #[tokio::test]
    async fn test_per_page_change_resets_to_first_page() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.set_page(3);
        settle(&w.browser).await;
        assert_eq!(w.browser.query().page, 3);

        w.browser.set_per_page(25);
        settle(&w.browser).await;
        assert_eq!(w.browser.query().page, 1);

        let last = w.adapter.fetch_calls().pop().unwrap();
        assert_eq!(last, ListParams::new().page(1).per_page(25));
    }

    #[tokio::test]
    async fn test_search_without_dedicated_endpoint_falls_back_to_fetch() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.set_search("acme");
        settle(&w.browser).await;

        let calls = w.adapter.fetch_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            ListParams::new().search("acme").page(1).per_page(10)
        );
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_list_unchanged() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;
        assert_eq!(w.browser.visible().len(), 7);

        w.adapter.fail_deletes("409 conflict");
        let victim = w.browser.visible()[0].clone();
        w.browser.stage_delete(victim.clone());
        w.browser.confirm_delete().await;

        // Staged state cleared, failure surfaced, row still present,
        // and no refetch was triggered.
        assert_eq!(*w.browser.dialog(), DialogState::Closed);
        let (level, message) = w.notifier.last().unwrap();
        assert_eq!(level, NoticeLevel::Error);
        assert!(message.contains("409 conflict"));
        assert!(
            w.browser
                .visible()
                .iter()
                .any(|r| r.id().coerced_eq(&victim.id()))
        );
        assert_eq!(w.adapter.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_success_invalidates_and_notifies() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;

        let victim = w.browser.visible()[0].clone();
        w.browser.stage_delete(victim);
        w.browser.confirm_delete().await;
        settle(&w.browser).await;

        assert_eq!(w.notifier.last().unwrap().0, NoticeLevel::Success);
        assert_eq!(w.adapter.fetch_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_delete_has_no_side_effects() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;

        let victim = w.browser.visible()[0].clone();
        w.browser.stage_delete(victim);
        w.browser.cancel_delete();

        assert_eq!(*w.browser.dialog(), DialogState::Closed);
        assert!(w.notifier.notices().is_empty());
        assert!(
            !w.adapter
                .calls()
                .iter()
                .any(|c| matches!(c, tablo_testing::AdapterCall::Delete(_)))
        );
    }

    #[tokio::test]
    async fn test_submit_success_closes_and_invalidates() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.open_create();
        w.browser.submit_succeeded();
        settle(&w.browser).await;

        assert_eq!(*w.browser.dialog(), DialogState::Closed);
        assert_eq!(w.adapter.fetch_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_board_move_runs_handler_then_invalidates() {
        let moves: Arc<Mutex<Vec<StatusChange>>> = Arc::new(Mutex::new(Vec::new()));
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
            .board(board())
            .on_status_change(handler);
        let mut w = world(config, "view=board");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.pick_up(Key::Int(10));
        let outcome = w
            .browser
            .drop_on(Some(DropTarget::Column(Key::Int(3))))
            .await;
        settle(&w.browser).await;

        assert!(matches!(outcome, DropOutcome::Moved(_)));
        assert_eq!(
            *moves.lock().unwrap(),
            vec![StatusChange {
                id: Key::Int(10),
                to: Key::Int(3),
            }]
        );
        // Handler succeeded: exactly one invalidate refetch.
        assert_eq!(w.adapter.fetch_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_board_drop_in_same_column_calls_nothing() {
        let moves: Arc<Mutex<Vec<StatusChange>>> = Arc::new(Mutex::new(Vec::new()));
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
            .board(board())
            .on_status_change(handler);
        let mut w = world(config, "view=board");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.pick_up(Key::Int(10));
        let outcome = w
            .browser
            .drop_on(Some(DropTarget::Column(Key::Int(1))))
            .await;

        assert_eq!(outcome, DropOutcome::NoOp);
        assert!(moves.lock().unwrap().is_empty());
        assert_eq!(w.adapter.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_board_move_failure_keeps_board_untouched() {
        let handler: StatusHandler =
            Arc::new(|_change| Box::pin(async { anyhow::bail!("stage transition rejected") }));
        let config = BrowserConfig::new(fields())
            .board(board())
            .on_status_change(handler);
        let mut w = world(config, "view=board");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.pick_up(Key::Int(10));
        let outcome = w
            .browser
            .drop_on(Some(DropTarget::Column(Key::Int(3))))
            .await;

        // The engine still reports the move, but nothing was applied:
        // no invalidate, and the failure is surfaced.
        assert!(matches!(outcome, DropOutcome::Moved(_)));
        assert_eq!(w.adapter.fetch_calls().len(), 1);
        assert_eq!(w.notifier.last().unwrap().0, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_view_mode_round_trips_through_route() {
        let mut w = world(BrowserConfig::new(fields()), "page=2&view=board");
        assert_eq!(w.browser.view_mode(), ViewMode::Board);

        w.browser.set_view_mode(ViewMode::Grid);
        assert_eq!(w.browser.route(), "page=2&view=grid");
        assert_eq!(ViewMode::from_query(w.browser.route()), ViewMode::Grid);
    }

    #[tokio::test]
    async fn test_unknown_route_value_defaults_to_table() {
        let w = world(BrowserConfig::new(fields()), "view=spreadsheet");
        assert_eq!(w.browser.view_mode(), ViewMode::Table);
    }

    #[tokio::test]
    async fn test_data_mapper_reshapes_page() {
        let mapper: DataMapper = Arc::new(|records| {
            records
                .into_iter()
                .filter(|r| r.key_at(&"stage.id".into()) != Some(Key::Int(99)))
                .collect()
        });
        let mut w = world(BrowserConfig::new(fields()).data_mapper(mapper), "");
        w.browser.sync();
        settle(&w.browser).await;
        assert_eq!(w.browser.visible().len(), 6);
    }

    #[tokio::test]
    async fn test_sort_only_on_sortable_fields() {
        let mut w = world(BrowserConfig::new(fields()), "");
        w.browser.sync();
        settle(&w.browser).await;

        w.browser.toggle_sort(&"value".into());
        let values: Vec<_> = w
            .browser
            .visible()
            .iter()
            .map(|r| r.text(&"value".into()).unwrap())
            .collect();
        assert_eq!(values[0], "5000");

        // "stage.id" is not declared sortable; toggling is ignored.
        w.browser.toggle_sort(&"stage.id".into());
        assert_eq!(w.browser.sort().key, Some("value".into()));
    }
}
