use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use tablo_adapters::{Error, ListParams, ResourceAdapter, Result};
use tablo_types::{Key, Page};

/// One call the mock observed, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    Fetch(ListParams),
    Search(String, ListParams),
    Delete(Key),
}

/// Handle to a held fetch; the fetch completes once released.
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn release(&self) {
        self.0.add_permits(1);
    }
}

/// Scripted adapter for tests.
///
/// Responses are keyed by the exact fetch parameters, with a default
/// page for everything unscripted. Without `with_dedicated_search` the
/// mock reproduces the trait's fallback byte-for-byte: the query is
/// folded into the parameters and only a `Fetch` call is recorded, so
/// tests can assert the exact fallback arguments.
pub struct MockAdapter {
    endpoint: String,
    dedicated_search: bool,
    default_page: Mutex<Page>,
    responses: Mutex<HashMap<String, Page>>,
    search_responses: Mutex<HashMap<String, Page>>,
    fetch_failure: Mutex<Option<String>>,
    delete_failure: Mutex<Option<String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<AdapterCall>>,
}

impl MockAdapter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            dedicated_search: false,
            default_page: Mutex::new(Page::empty()),
            responses: Mutex::new(HashMap::new()),
            search_responses: Mutex::new(HashMap::new()),
            fetch_failure: Mutex::new(None),
            delete_failure: Mutex::new(None),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pretend the backend has a dedicated search endpoint; queries are
    /// answered from `respond_search` scripts and recorded as `Search`.
    pub fn with_dedicated_search(mut self) -> Self {
        self.dedicated_search = true;
        self
    }

    pub fn set_default_page(&self, page: Page) {
        *self.default_page.lock().unwrap() = page;
    }

    /// Script the response for one exact parameter set.
    pub fn respond(&self, params: &ListParams, page: Page) {
        self.responses
            .lock()
            .unwrap()
            .insert(signature(params), page);
    }

    pub fn respond_search(&self, query: impl Into<String>, page: Page) {
        self.search_responses
            .lock()
            .unwrap()
            .insert(query.into(), page);
    }

    /// Make every subsequent fetch fail with this message.
    pub fn fail_fetches(&self, message: impl Into<String>) {
        *self.fetch_failure.lock().unwrap() = Some(message.into());
    }

    pub fn clear_fetch_failure(&self) {
        *self.fetch_failure.lock().unwrap() = None;
    }

    /// Make every subsequent delete fail with this message.
    pub fn fail_deletes(&self, message: impl Into<String>) {
        *self.delete_failure.lock().unwrap() = Some(message.into());
    }

    /// Hold fetches for these exact parameters open until the returned
    /// gate is released. Each held fetch consumes one release.
    pub fn hold(&self, params: &ListParams) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(signature(params), semaphore.clone());
        Gate(semaphore)
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> Vec<ListParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AdapterCall::Fetch(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: AdapterCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn gate_for(&self, sig: &str) -> Option<Arc<Semaphore>> {
        self.gates.lock().unwrap().get(sig).cloned()
    }
}

impl ResourceAdapter for MockAdapter {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_page(&self, params: &ListParams) -> Result<Page> {
        let sig = signature(params);
        self.record(AdapterCall::Fetch(params.clone()));

        if let Some(gate) = self.gate_for(&sig) {
            // Held open until the test releases the gate.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        if let Some(message) = self.fetch_failure.lock().unwrap().clone() {
            return Err(Error::Backend(message));
        }

        let scripted = self.responses.lock().unwrap().get(&sig).cloned();
        Ok(scripted.unwrap_or_else(|| self.default_page.lock().unwrap().clone()))
    }

    async fn search_page(&self, query: &str, params: &ListParams) -> Result<Page> {
        if !self.dedicated_search {
            // Mirror the trait default so tests observe the exact
            // fallback call shape.
            let merged = params.clone().search(query);
            return self.fetch_page(&merged).await;
        }

        self.record(AdapterCall::Search(query.to_string(), params.clone()));

        if let Some(message) = self.fetch_failure.lock().unwrap().clone() {
            return Err(Error::Backend(message));
        }

        let scripted = self.search_responses.lock().unwrap().get(query).cloned();
        Ok(scripted.unwrap_or_else(|| self.default_page.lock().unwrap().clone()))
    }

    async fn delete(&self, id: &Key) -> Result<()> {
        self.record(AdapterCall::Delete(id.clone()));
        match self.delete_failure.lock().unwrap().clone() {
            Some(message) => Err(Error::Backend(message)),
            None => Ok(()),
        }
    }
}

fn signature(params: &ListParams) -> String {
    serde_json::to_string(params).unwrap_or_default()
}
