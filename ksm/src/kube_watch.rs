//! The production [`ListWatch`] adapter: a thin pass-through over
//! `kube::Api`, not a reimplementation of its transport.

use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::Metadata;
use kube::api::{Api, ListParams, WatchEvent as KubeWatchEvent, WatchParams};
use kube::Resource;
use ksm_core::watch::{ListResult, ListWatch, ListWatchOptions, TransportError, WatchEvent};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Adapts one `kube::Api<K>` (already scoped to a namespace or the whole
/// cluster by the builder) to [`ListWatch<K>`].
pub struct KubeListWatch<K> {
    api: Api<K>,
}

impl<K> KubeListWatch<K> {
    pub fn new(api: Api<K>) -> Self {
        Self { api }
    }
}

fn list_params(options: &ListWatchOptions) -> ListParams {
    let mut lp = ListParams::default();
    if let Some(selector) = &options.field_selector {
        lp = lp.fields(selector);
    }
    if let Some(limit) = options.limit {
        lp = lp.limit(limit);
    }
    lp
}

fn watch_params(options: &ListWatchOptions) -> WatchParams {
    let mut wp = WatchParams::default();
    if let Some(selector) = &options.field_selector {
        wp = wp.fields(selector);
    }
    wp
}

#[async_trait::async_trait]
impl<K> ListWatch<K> for KubeListWatch<K>
where
    K: Resource<DynamicType = ()>
        + Metadata<Ty = k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta>
        + Clone
        + Debug
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    async fn list(&self, options: &ListWatchOptions) -> Result<ListResult<K>, TransportError> {
        let list = self
            .api
            .list(&list_params(options))
            .await
            .map_err(|err| TransportError::Other(err.to_string()))?;
        let resource_version = list.metadata.resource_version.clone().unwrap_or_default();
        let truncated = list.metadata.continue_.is_some();
        Ok(ListResult {
            items: list.items,
            resource_version,
            truncated,
        })
    }

    fn watch(
        &self,
        options: &ListWatchOptions,
        resource_version: &str,
    ) -> BoxStream<'static, Result<WatchEvent<K>, TransportError>> {
        let api = self.api.clone();
        let wp = watch_params(options);
        let version = resource_version.to_string();
        Box::pin(
            futures::stream::once(async move { api.watch(&wp, &version).await })
                .map(|result| match result {
                    Ok(stream) => stream.boxed(),
                    Err(err) => futures::stream::once(async move { Err(err) }).boxed(),
                })
                .flatten()
                .map(|event| match event {
                    Ok(KubeWatchEvent::Added(obj)) => Ok(WatchEvent::Added(obj)),
                    Ok(KubeWatchEvent::Modified(obj)) => Ok(WatchEvent::Modified(obj)),
                    Ok(KubeWatchEvent::Deleted(obj)) => Ok(WatchEvent::Deleted(obj)),
                    Ok(KubeWatchEvent::Bookmark(bm)) => Ok(WatchEvent::Bookmark {
                        resource_version: bm.metadata.resource_version,
                    }),
                    Ok(KubeWatchEvent::Error(err)) => {
                        if err.reason == "Expired" || err.code == 410 {
                            Ok(WatchEvent::Error(TransportError::ResourceVersionTooOld))
                        } else {
                            Ok(WatchEvent::Error(TransportError::Other(err.to_string())))
                        }
                    }
                    Err(err) => Err(TransportError::Other(err.to_string())),
                }),
        )
    }
}

/// Namespace-scope helper for namespaced kinds: cluster-scoped kinds always
/// call `Api::all` directly and never go through this function.
pub fn api_for<K>(client: kube::Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<DynamicType = ()> + Send + Sync,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}
