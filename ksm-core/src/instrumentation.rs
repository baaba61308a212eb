//! Instrumentation wrapper: counts list/watch calls, errors, and observed
//! item volume without changing list-watch behavior.

use crate::watch::{ListResult, ListWatch, ListWatchOptions, TransportError, WatchEvent};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// The four counters this wrapper tracks, labeled by object-kind-name at the
/// caller's discretion (one [`KindCounters`] per kind, held by the builder),
/// plus the read-only "server-cached reads" hint gauge.
#[derive(Debug, Default)]
pub struct KindCounters {
    pub lists_attempted: AtomicU64,
    pub lists_errored: AtomicU64,
    pub watches_attempted: AtomicU64,
    pub watches_errored: AtomicU64,
    pub items_observed: AtomicU64,
    pub events_observed: AtomicU64,
    using_server_cached_reads: AtomicBool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCountersSnapshot {
    pub lists_attempted: u64,
    pub lists_errored: u64,
    pub watches_attempted: u64,
    pub watches_errored: u64,
    pub items_observed: u64,
    pub events_observed: u64,
    pub using_server_cached_reads: bool,
}

impl KindCounters {
    /// Records the builder's `use_server_cached_reads` hint for this kind.
    /// A read-only hint, not behavior: it never changes what gets fetched.
    pub fn set_using_server_cached_reads(&self, value: bool) {
        self.using_server_cached_reads.store(value, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> KindCountersSnapshot {
        KindCountersSnapshot {
            lists_attempted: self.lists_attempted.load(Ordering::Relaxed),
            lists_errored: self.lists_errored.load(Ordering::Relaxed),
            watches_attempted: self.watches_attempted.load(Ordering::Relaxed),
            watches_errored: self.watches_errored.load(Ordering::Relaxed),
            items_observed: self.items_observed.load(Ordering::Relaxed),
            events_observed: self.events_observed.load(Ordering::Relaxed),
            using_server_cached_reads: self.using_server_cached_reads.load(Ordering::Relaxed),
        }
    }
}

/// Wraps a [`ListWatch`] to increment, without changing behavior, its
/// [`KindCounters`].
pub struct InstrumentedListWatch<K> {
    inner: Arc<dyn ListWatch<K>>,
    counters: Arc<KindCounters>,
}

impl<K> InstrumentedListWatch<K> {
    pub fn new(inner: Arc<dyn ListWatch<K>>, counters: Arc<KindCounters>) -> Self {
        Self { inner, counters }
    }
}

#[async_trait::async_trait]
impl<K: Send + Sync + 'static> ListWatch<K> for InstrumentedListWatch<K> {
    async fn list(&self, options: &ListWatchOptions) -> Result<ListResult<K>, TransportError> {
        self.counters.lists_attempted.fetch_add(1, Ordering::Relaxed);
        match self.inner.list(options).await {
            Ok(result) => {
                self.counters
                    .items_observed
                    .fetch_add(result.items.len() as u64, Ordering::Relaxed);
                Ok(result)
            }
            Err(err) => {
                self.counters.lists_errored.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    fn watch(
        &self,
        options: &ListWatchOptions,
        resource_version: &str,
    ) -> BoxStream<'static, Result<WatchEvent<K>, TransportError>> {
        self.counters.watches_attempted.fetch_add(1, Ordering::Relaxed);
        let counters = Arc::clone(&self.counters);
        let stream = self.inner.watch(options, resource_version);
        Box::pin(stream.inspect(move |event| {
            counters.events_observed.fetch_add(1, Ordering::Relaxed);
            if matches!(event, Err(_) | Ok(WatchEvent::Error(_))) {
                counters.watches_errored.fetch_add(1, Ordering::Relaxed);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::test::Scripted;

    #[derive(Clone, Debug)]
    struct Obj;

    #[tokio::test]
    async fn counts_successful_list_and_items() {
        let inner = Scripted::new(
            vec![ListResult { items: vec![Obj, Obj, Obj], resource_version: "1".into(), truncated: false }],
            vec![],
        );
        let counters = Arc::new(KindCounters::default());
        let wrapped = InstrumentedListWatch::new(inner, Arc::clone(&counters));
        wrapped.list(&ListWatchOptions::default()).await.unwrap();
        let snap = counters.snapshot();
        assert_eq!(snap.lists_attempted, 1);
        assert_eq!(snap.lists_errored, 0);
        assert_eq!(snap.items_observed, 3);
    }

    #[tokio::test]
    async fn counts_watch_events_and_errors() {
        let inner = Scripted::<Obj>::new(
            vec![ListResult { items: vec![], resource_version: "1".into(), truncated: false }],
            vec![Ok(WatchEvent::Added(Obj)), Err(TransportError::Other("boom".into()))],
        );
        let counters = Arc::new(KindCounters::default());
        let wrapped = InstrumentedListWatch::new(inner, Arc::clone(&counters));
        let events: Vec<_> = wrapped
            .watch(&ListWatchOptions::default(), "1")
            .collect::<Vec<_>>()
            .await;
        assert_eq!(events.len(), 2);
        let snap = counters.snapshot();
        assert_eq!(snap.watches_attempted, 1);
        assert_eq!(snap.events_observed, 2);
        assert_eq!(snap.watches_errored, 1);
    }
}
