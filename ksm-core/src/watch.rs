//! The abstract list-watch contract the reflector drives.
//!
//! This crate never talks to an orchestration API itself — that transport,
//! its auth, and its kubeconfig discovery are explicitly out of scope.
//! `ksm` (the facade crate) supplies the production adapter over
//! the real `kube` crate; [`test::Scripted`] below is an in-memory fake used
//! by this crate's own tests, grounded in `kube_runtime::cache`'s
//! `stream::iter`-based test fixtures.

use futures::stream::BoxStream;
use std::fmt;

/// One event out of a watch stream: `{added, modified, deleted, bookmark,
/// error}`.
#[derive(Debug, Clone)]
pub enum WatchEvent<K> {
    Added(K),
    Modified(K),
    Deleted(K),
    Bookmark { resource_version: String },
    Error(TransportError),
}

/// A finite, versioned list snapshot.
#[derive(Debug, Clone)]
pub struct ListResult<K> {
    pub items: Vec<K>,
    pub resource_version: String,
    /// Set when a `limit` was supplied and the server indicated more pages
    /// remained; the builder logs this but treats it as non-fatal.
    pub truncated: bool,
}

/// Parameters threaded into `list`/`watch` (namespace scope, field selector,
/// paging, and the "use server-cached reads" hint).
#[derive(Clone, Default)]
pub struct ListWatchOptions {
    pub namespace: Option<String>,
    pub field_selector: Option<String>,
    pub limit: Option<u32>,
    pub use_server_cached_reads: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("resource version too old, resync required")]
    ResourceVersionTooOld,
    #[error("list/watch transport error: {0}")]
    Other(String),
}

/// The contract a reflector drives. Implementors are not required to
/// be cheap to construct, but must be cheap to hold for the lifetime of one
/// reflector task.
#[async_trait::async_trait]
pub trait ListWatch<K>: Send + Sync
where
    K: Send + 'static,
{
    async fn list(&self, options: &ListWatchOptions) -> Result<ListResult<K>, TransportError>;

    fn watch(
        &self,
        options: &ListWatchOptions,
        resource_version: &str,
    ) -> BoxStream<'static, Result<WatchEvent<K>, TransportError>>;
}

impl fmt::Debug for ListWatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListWatchOptions")
            .field("namespace", &self.namespace)
            .field("field_selector", &self.field_selector)
            .field("limit", &self.limit)
            .field("use_server_cached_reads", &self.use_server_cached_reads)
            .finish()
    }
}

/// In-memory test double. Not used in production code.
pub mod test {
    use super::*;
    use futures::stream;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A fixed script of list responses (consumed one per `list()` call,
    /// the last is repeated once exhausted) and one canned watch stream.
    pub struct Scripted<K> {
        lists: Mutex<Vec<ListResult<K>>>,
        watch_events: Mutex<Option<Vec<Result<WatchEvent<K>, TransportError>>>>,
    }

    impl<K: Clone + Send + Sync + 'static> Scripted<K> {
        pub fn new(lists: Vec<ListResult<K>>, watch_events: Vec<Result<WatchEvent<K>, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                lists: Mutex::new(lists),
                watch_events: Mutex::new(Some(watch_events)),
            })
        }
    }

    #[async_trait::async_trait]
    impl<K: Clone + Send + Sync + 'static> ListWatch<K> for Scripted<K> {
        async fn list(&self, _options: &ListWatchOptions) -> Result<ListResult<K>, TransportError> {
            let mut lists = self.lists.lock();
            if lists.len() > 1 {
                Ok(lists.remove(0))
            } else {
                Ok(lists.first().cloned().unwrap_or(ListResult {
                    items: vec![],
                    resource_version: "0".to_string(),
                    truncated: false,
                }))
            }
        }

        fn watch(
            &self,
            _options: &ListWatchOptions,
            _resource_version: &str,
        ) -> BoxStream<'static, Result<WatchEvent<K>, TransportError>> {
            let events = self.watch_events.lock().take().unwrap_or_default();
            Box::pin(stream::iter(events))
        }
    }
}
