//! Sharded list-watch filter.

use crate::key::ShardId;
use crate::watch::{ListResult, ListWatch, ListWatchOptions, TransportError, WatchEvent};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;

/// Wraps a [`ListWatch`] so only objects owned by this replica's shard are
/// ever delivered to list or watch callers. Filtering is applied to both
/// list and watch results to prevent transient duplicates during startup.
pub struct ShardedListWatch<K> {
    inner: Arc<dyn ListWatch<K>>,
    shard: ShardId,
    uid_of: Arc<dyn Fn(&K) -> String + Send + Sync>,
}

impl<K> ShardedListWatch<K> {
    pub fn new(inner: Arc<dyn ListWatch<K>>, shard: ShardId, uid_of: impl Fn(&K) -> String + Send + Sync + 'static) -> Self {
        Self {
            inner,
            shard,
            uid_of: Arc::new(uid_of),
        }
    }
}

#[async_trait::async_trait]
impl<K: Send + Sync + 'static> ListWatch<K> for ShardedListWatch<K> {
    async fn list(&self, options: &ListWatchOptions) -> Result<ListResult<K>, TransportError> {
        let mut result = self.inner.list(options).await?;
        result.items.retain(|obj| self.shard.owns(&(self.uid_of)(obj)));
        Ok(result)
    }

    fn watch(
        &self,
        options: &ListWatchOptions,
        resource_version: &str,
    ) -> BoxStream<'static, Result<WatchEvent<K>, TransportError>> {
        let shard = self.shard;
        let uid_of = Arc::clone(&self.uid_of);
        let stream = self.inner.watch(options, resource_version);
        Box::pin(stream.filter(move |event| {
            let keep = match event {
                Ok(WatchEvent::Added(obj)) | Ok(WatchEvent::Modified(obj)) | Ok(WatchEvent::Deleted(obj)) => {
                    shard.owns(&uid_of(obj))
                }
                // Bookmarks and errors carry no object identity; they are not shard-filtered.
                Ok(WatchEvent::Bookmark { .. }) | Ok(WatchEvent::Error(_)) | Err(_) => true,
            };
            futures::future::ready(keep)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::test::Scripted;
    use std::collections::HashSet;

    #[derive(Clone, Debug)]
    struct Obj {
        uid: String,
    }

    fn uid_of(o: &Obj) -> String {
        o.uid.clone()
    }

    #[tokio::test]
    async fn shard_union_equals_unsharded_set_and_is_disjoint() {
        let objs: Vec<Obj> = (0..1000).map(|i| Obj { uid: format!("uid-{i}") }).collect();
        let total = 4u64;

        let mut per_shard_keys: Vec<HashSet<String>> = Vec::new();
        for ordinal in 0..total {
            let inner = Scripted::new(
                vec![ListResult { items: objs.clone(), resource_version: "1".into(), truncated: false }],
                vec![],
            );
            let shard = ShardId::new(ordinal, total).unwrap();
            let wrapped = ShardedListWatch::new(inner, shard, uid_of);
            let result = wrapped.list(&ListWatchOptions::default()).await.unwrap();
            per_shard_keys.push(result.items.iter().map(|o| o.uid.clone()).collect());
        }

        let mut union: HashSet<String> = HashSet::new();
        for keys in &per_shard_keys {
            union.extend(keys.iter().cloned());
        }
        assert_eq!(union.len(), objs.len());

        for i in 0..per_shard_keys.len() {
            for j in (i + 1)..per_shard_keys.len() {
                assert!(per_shard_keys[i].is_disjoint(&per_shard_keys[j]));
            }
        }
    }

    #[tokio::test]
    async fn total_le_one_is_identity() {
        let objs = vec![Obj { uid: "a".into() }, Obj { uid: "b".into() }];
        let inner = Scripted::new(
            vec![ListResult { items: objs.clone(), resource_version: "1".into(), truncated: false }],
            vec![],
        );
        let wrapped = ShardedListWatch::new(inner, ShardId::unsharded(), uid_of);
        let result = wrapped.list(&ListWatchOptions::default()).await.unwrap();
        assert_eq!(result.items.len(), 2);
    }

    #[tokio::test]
    async fn watch_stream_is_filtered_like_list() {
        let inner = Scripted::new(
            vec![ListResult { items: vec![], resource_version: "1".into(), truncated: false }],
            vec![
                Ok(WatchEvent::Added(Obj { uid: "uid-0".into() })),
                Ok(WatchEvent::Added(Obj { uid: "uid-1".into() })),
                Ok(WatchEvent::Added(Obj { uid: "uid-2".into() })),
            ],
        );
        // Find an ordinal that owns uid-0 but not uid-1 or uid-2, or vice versa;
        // with total=2 every uid is owned by exactly one of the two ordinals.
        let shard0 = ShardId::new(0, 2).unwrap();
        let wrapped = ShardedListWatch::new(inner, shard0, uid_of);
        let events: Vec<_> = wrapped
            .watch(&ListWatchOptions::default(), "1")
            .collect::<Vec<_>>()
            .await;
        let kept: Vec<String> = events
            .into_iter()
            .filter_map(|e| match e {
                Ok(WatchEvent::Added(o)) => Some(o.uid),
                _ => None,
            })
            .collect();
        for uid in &kept {
            assert!(shard0.owns(uid));
        }
    }
}
