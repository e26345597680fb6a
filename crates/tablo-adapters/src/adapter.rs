use std::future::Future;

use tablo_types::{Key, Page};

use crate::error::Result;
use crate::params::ListParams;

/// The external CRUD/search interface the controller consumes.
///
/// Responsibilities:
/// - Fetch one page of a collection with pagination metadata
/// - Optionally expose a dedicated search operation
/// - Delete a record by id
///
/// All domain and network logic lives behind this trait; the controller
/// only renders what comes back and issues calls. Implementations own
/// retry/backoff policy if they want one; the controller never retries.
pub trait ResourceAdapter: Send + Sync {
    /// Name of the collection this adapter serves, used as the cache
    /// key namespace (e.g. "leads").
    fn endpoint(&self) -> &str;

    /// Fetch one page. Adapters without a dedicated search endpoint
    /// receive the free-text query in `params.search` and may interpret
    /// it however the backend supports.
    fn fetch_page(&self, params: &ListParams) -> impl Future<Output = Result<Page>> + Send;

    /// Search the collection. The default folds the query into
    /// [`ListParams::search`] and delegates to [`Self::fetch_page`];
    /// adapters backed by a dedicated search endpoint override this.
    fn search_page(
        &self,
        query: &str,
        params: &ListParams,
    ) -> impl Future<Output = Result<Page>> + Send {
        let merged = params.clone().search(query);
        async move { self.fetch_page(&merged).await }
    }

    /// Delete one record by id.
    fn delete(&self, id: &Key) -> impl Future<Output = Result<()>> + Send;
}
