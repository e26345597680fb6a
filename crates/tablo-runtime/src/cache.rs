use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use tablo_adapters::ResourceAdapter;
use tablo_engine::FetchPlan;
use tablo_types::{Key, Page};

/// Identity of one collection fetch.
///
/// Client-side filters never appear here (they narrow an already
/// fetched page); `filters` carries only constraints a caller routed
/// server-side, which genuinely change what the backend returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub endpoint: String,
    pub search: String,
    pub page: u64,
    pub per_page: u64,
    pub filters: BTreeMap<String, Key>,
}

impl FetchKey {
    pub fn from_plan(endpoint: &str, plan: &FetchPlan) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            search: plan.search.clone().unwrap_or_default(),
            page: plan.params.page.unwrap_or(1),
            per_page: plan.params.per_page.unwrap_or(tablo_types::DEFAULT_PER_PAGE),
            filters: plan.params.filters.clone(),
        }
    }
}

/// What a reader sees: the last good page (possibly from a superseded
/// key), whether a fetch is outstanding, and the last error if any.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub key: Option<FetchKey>,
    pub data: Option<Page>,
    pub loading: bool,
    pub error: Option<String>,
}

struct CacheState {
    key: Option<FetchKey>,
    plan: Option<FetchPlan>,
    generation: u64,
    data: Option<Page>,
    loading: bool,
    error: Option<String>,
}

impl CacheState {
    fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            key: self.key.clone(),
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// Request-keyed cache over one adapter endpoint.
///
/// One slot, superseded atomically. Every completion carries the
/// generation it was started under and is discarded if the slot has
/// moved on; a response for a stale key can never overwrite the slot
/// now associated with a newer key. Within one key, concurrent
/// `ensure` calls share the single in-flight request, and the last
/// good page stays visible while a newer fetch is pending so a key
/// change never flashes to empty.
pub struct CollectionCache<A> {
    adapter: Arc<A>,
    endpoint: String,
    state: Arc<Mutex<CacheState>>,
    tx: watch::Sender<CacheSnapshot>,
}

impl<A: ResourceAdapter + 'static> CollectionCache<A> {
    pub fn new(adapter: Arc<A>) -> Self {
        let endpoint = adapter.endpoint().to_string();
        let (tx, _rx) = watch::channel(CacheSnapshot::default());
        Self {
            adapter,
            endpoint,
            state: Arc::new(Mutex::new(CacheState {
                key: None,
                plan: None,
                generation: 0,
                data: None,
                loading: false,
                error: None,
            })),
            tx,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.lock().unwrap().snapshot()
    }

    /// Change notifications for hosts that re-render on completion.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.tx.subscribe()
    }

    /// Make `plan` the active fetch. A no-op when the derived key is
    /// already active and either resolved or in flight; otherwise the
    /// slot is re-keyed, the generation advances (orphaning any older
    /// in-flight response), and one fetch starts. A key that resolved
    /// to an error is not retried here; retry comes from the next
    /// key change or an explicit [`CollectionCache::invalidate`].
    pub fn ensure(&self, plan: &FetchPlan) {
        let key = FetchKey::from_plan(&self.endpoint, plan);
        let generation = {
            let mut state = self.state.lock().unwrap();
            if state.key.as_ref() == Some(&key) {
                return;
            }
            state.key = Some(key);
            state.plan = Some(plan.clone());
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.generation
        };
        self.publish();
        self.spawn_fetch(generation, plan.clone());
    }

    /// Re-fetch the currently-active key exactly once. The bumped
    /// generation also orphans any fetch still in flight.
    pub fn invalidate(&self) {
        let (generation, plan) = {
            let mut state = self.state.lock().unwrap();
            let Some(plan) = state.plan.clone() else {
                return;
            };
            state.generation += 1;
            state.loading = true;
            (state.generation, plan)
        };
        self.publish();
        self.spawn_fetch(generation, plan);
    }

    fn spawn_fetch(&self, generation: u64, plan: FetchPlan) {
        let adapter = self.adapter.clone();
        let state = self.state.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match plan.search.as_deref() {
                Some(query) => adapter.search_page(query, &plan.params).await,
                None => adapter.fetch_page(&plan.params).await,
            };
            let snapshot = {
                let mut state = state.lock().unwrap();
                // Superseded while in flight: a newer ensure/invalidate
                // owns the slot now. Drop the response unseen.
                if state.generation != generation {
                    return;
                }
                state.loading = false;
                match result {
                    Ok(page) => {
                        state.data = Some(page);
                        state.error = None;
                    }
                    Err(err) => {
                        // Keep the last good page; error renders beside it.
                        state.error = Some(err.to_string());
                    }
                }
                state.snapshot()
            };
            let _ = tx.send(snapshot);
        });
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        let _ = self.tx.send(snapshot);
    }
}
