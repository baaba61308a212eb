//! The per-kind reflector state machine.

use crate::key::ObjectKey;
use crate::store::Writer;
use crate::watch::{ListWatch, ListWatchOptions, TransportError, WatchEvent};
use backoff::backoff::Backoff;
use backoff::ExponentialBackoffBuilder;
use futures::StreamExt;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The reflector's explicit state machine. Exposed read-only for
/// diagnostics/tests; the transition logic lives entirely in [`Reflector::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectorState {
    Init,
    Listing,
    Streaming,
    ResyncPending,
    Stopped,
}

/// A non-trivial streaming epoch resets the backoff.
const NON_TRIVIAL_EPOCH: Duration = Duration::from_secs(60);
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Drives one [`Writer`] from one `(kind, scope)` list-watch source. Runs as
/// a single background task; never shared across kinds.
pub struct Reflector<K> {
    list_watch: Arc<dyn ListWatch<K>>,
    options: ListWatchOptions,
    kind_name: String,
    key_fn: Arc<dyn Fn(&K) -> ObjectKey + Send + Sync>,
    state: Arc<RwLock<ReflectorState>>,
    using_server_cache: Arc<AtomicBool>,
}

impl<K: Clone + Send + Sync + 'static> Reflector<K> {
    pub fn new(
        list_watch: Arc<dyn ListWatch<K>>,
        options: ListWatchOptions,
        kind_name: impl Into<String>,
        key_fn: impl Fn(&K) -> ObjectKey + Send + Sync + 'static,
    ) -> Self {
        Self {
            list_watch,
            options,
            kind_name: kind_name.into(),
            key_fn: Arc::new(key_fn),
            state: Arc::new(RwLock::new(ReflectorState::Init)),
            using_server_cache: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> ReflectorState {
        *self.state.read()
    }

    /// Whether the underlying transport is (as far as this adapter can
    /// tell) reading from the server's cached resource-version. Exposed as
    /// a read-only hint gauge.
    pub fn using_server_cached_reads(&self) -> bool {
        self.using_server_cache.load(Ordering::Relaxed)
    }

    fn set_state(&self, s: ReflectorState) {
        *self.state.write() = s;
    }

    /// Runs until `cancel` is triggered (terminal `Stopped` state).
    pub async fn run(self, writer: Writer<K>, cancel: CancellationToken) {
        self.using_server_cache
            .store(self.options.use_server_cached_reads, Ordering::Relaxed);
        let mut backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(INITIAL_BACKOFF)
            .with_max_interval(MAX_BACKOFF)
            .with_max_elapsed_time(None)
            .build();
        self.set_state(ReflectorState::Init);

        'outer: loop {
            if cancel.is_cancelled() {
                break;
            }
            self.set_state(ReflectorState::Listing);
            let list_result = tokio::select! {
                _ = cancel.cancelled() => break 'outer,
                res = self.list_watch.list(&self.options) => res,
            };
            let list_result = match list_result {
                Ok(r) => r,
                Err(err) => {
                    tracing::warn!(kind = %self.kind_name, %err, "list failed, entering resync backoff");
                    self.set_state(ReflectorState::ResyncPending);
                    let delay = backoff.next_backoff().unwrap_or(MAX_BACKOFF);
                    if Self::sleep_or_cancel(delay, &cancel).await.is_err() {
                        break 'outer;
                    }
                    continue;
                }
            };
            if list_result.truncated {
                tracing::warn!(
                    kind = %self.kind_name,
                    "list page limit reached; store may be incomplete until next successful relist"
                );
            }
            writer.replace_all(list_result.items.iter().map(|o| ((self.key_fn)(o), o)));
            backoff.reset();

            let mut resource_version = list_result.resource_version;
            let mut stream = self.list_watch.watch(&self.options, &resource_version);
            self.set_state(ReflectorState::Streaming);
            let epoch_start = tokio::time::Instant::now();

            loop {
                let next = tokio::select! {
                    _ = cancel.cancelled() => break 'outer,
                    next = stream.next() => next,
                };
                match next {
                    None => {
                        tracing::debug!(kind = %self.kind_name, "watch stream ended, resyncing");
                        break;
                    }
                    Some(Ok(WatchEvent::Added(obj))) | Some(Ok(WatchEvent::Modified(obj))) => {
                        writer.put((self.key_fn)(&obj), &obj);
                    }
                    Some(Ok(WatchEvent::Deleted(obj))) => {
                        writer.delete(&(self.key_fn)(&obj));
                    }
                    Some(Ok(WatchEvent::Bookmark { resource_version: rv })) => {
                        resource_version = rv;
                    }
                    Some(Ok(WatchEvent::Error(TransportError::ResourceVersionTooOld))) => {
                        tracing::warn!(kind = %self.kind_name, "resource version too old, relisting");
                        break;
                    }
                    Some(Ok(WatchEvent::Error(err))) => {
                        tracing::warn!(kind = %self.kind_name, %err, "watch error, relisting");
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::warn!(kind = %self.kind_name, %err, "watch stream failed, relisting");
                        break;
                    }
                }
            }

            if epoch_start.elapsed() >= NON_TRIVIAL_EPOCH {
                backoff.reset();
            }
            self.set_state(ReflectorState::ResyncPending);
            let delay = backoff.next_backoff().unwrap_or(MAX_BACKOFF);
            if Self::sleep_or_cancel(delay, &cancel).await.is_err() {
                break 'outer;
            }
        }

        self.set_state(ReflectorState::Stopped);
        tracing::info!(kind = %self.kind_name, "reflector stopped");
    }

    async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> Result<(), ()> {
        tokio::select! {
            _ = cancel.cancelled() => Err(()),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Composer;
    use crate::watch::{test::Scripted, ListResult};

    #[derive(Clone, Debug, PartialEq)]
    struct Obj {
        name: String,
    }

    fn key_fn(o: &Obj) -> ObjectKey {
        ObjectKey::cluster_scoped(o.name.clone())
    }

    fn empty_composer() -> Composer<Obj> {
        Composer::new(vec![], Arc::new(|_: &Obj| vec![]))
    }

    #[tokio::test(start_paused = true)]
    async fn backfills_store_on_startup_list() {
        let lw = Scripted::new(
            vec![ListResult {
                items: vec![Obj { name: "a".into() }, Obj { name: "b".into() }],
                resource_version: "1".into(),
                truncated: false,
            }],
            vec![],
        );
        let writer = Writer::new(empty_composer());
        let reader = writer.as_reader();
        let reflector = Reflector::new(lw, ListWatchOptions::default(), "objs", key_fn);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(reflector.run(writer, cancel.clone()));
        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(reader.len(), 2);
        cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn applies_watch_events_after_list() {
        let lw = Scripted::new(
            vec![ListResult {
                items: vec![Obj { name: "a".into() }],
                resource_version: "1".into(),
                truncated: false,
            }],
            vec![
                Ok(WatchEvent::Added(Obj { name: "b".into() })),
                Ok(WatchEvent::Deleted(Obj { name: "a".into() })),
            ],
        );
        let writer = Writer::new(empty_composer());
        let reader = writer.as_reader();
        let reflector = Reflector::new(lw, ListWatchOptions::default(), "objs", key_fn);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(reflector.run(writer, cancel.clone()));
        tokio::time::advance(Duration::from_millis(10)).await;
        assert_eq!(reader.keys(), vec![ObjectKey::cluster_scoped("b")]);
        cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_cancellation() {
        let lw = Scripted::new(
            vec![ListResult { items: vec![], resource_version: "1".into(), truncated: false }],
            vec![],
        );
        let writer = Writer::new(empty_composer());
        let reflector = Reflector::new(lw, ListWatchOptions::default(), "objs", key_fn);
        let state_handle = reflector.state.clone();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(reflector.run(writer, cancel.clone()));
        tokio::time::advance(Duration::from_millis(10)).await;
        cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert_eq!(*state_handle.read(), ReflectorState::Stopped);
    }
}
