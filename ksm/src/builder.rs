//! `Config` -> `Exposer` construction: validates the configuration, then
//! wires one reflector task per `(kind, namespace)` pair and collects their
//! stores into a single [`Exposer`].

use crate::config::{Config, NamespaceScope};
use crate::custom::{CustomResourceContext, CustomResourceFactory};
use crate::error::ConfigError;
use crate::kube_watch::{api_for, KubeListWatch};
use crate::self_metrics::SelfMetricsWriter;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::Metadata;
use ksm_core::generator::{FamilyGenerator, IdentityLabelFn};
use ksm_core::key::{ObjectKey, ShardId};
use ksm_core::{
    AllowListMap, Composer, Exposer, ErasedKindWriter, FamilyGeneratorFilter, InstrumentedListWatch,
    KindCounters, KindWriter, ListWatch, ListWatchOptions, Reflector, ShardedListWatch, Writer,
};
use ksm_kinds::KindName;
use kube::Resource;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Builds an [`Exposer`] from a validated [`Config`] and a live `kube::Client`.
///
/// Every reflector is spawned onto the current Tokio runtime as a detached
/// task scoped to `cancel`; dropping/cancelling `cancel` stops every
/// reflector, but the returned `Exposer` itself has no shutdown hook of its
/// own (it only ever reads from the stores the reflectors write into).
pub struct Builder {
    client: kube::Client,
    cancel: CancellationToken,
    custom: Vec<Arc<dyn CustomResourceFactory>>,
}

impl Builder {
    pub fn new(client: kube::Client, cancel: CancellationToken) -> Self {
        Self {
            client,
            cancel,
            custom: Vec::new(),
        }
    }

    /// Registers a custom-resource factory into the kind map. Must be
    /// called before [`Builder::build`]; the kind map is frozen once a
    /// reflector starts. A factory whose name collides with a built-in
    /// [`KindName`] overrides it.
    #[must_use]
    pub fn with_custom_resource(mut self, factory: Arc<dyn CustomResourceFactory>) -> Self {
        self.custom.push(factory);
        self
    }

    pub fn build(&self, config: &Config) -> Result<Exposer, ConfigError> {
        self.build_with_filter(config, config.resolve_family_generator_filter())
    }

    /// Construction path taking the resolved filter explicitly rather than
    /// re-deriving it from `config`. `Config::resolve_family_generator_filter`
    /// always returns `Some`; a `None` here can only happen if a caller
    /// bypasses that resolution, which is a programmer error, not a
    /// configuration one, so it panics instead of returning a `ConfigError`.
    fn build_with_filter(
        &self,
        config: &Config,
        filter: Option<FamilyGeneratorFilter>,
    ) -> Result<Exposer, ConfigError> {
        let filter = require_family_generator_filter(filter);

        let custom_names: Vec<&str> = self.custom.iter().map(|f| f.name()).collect();
        let kind_names = resolve_enabled_kind_names(&config.enabled_kinds, &custom_names)?;

        let shard = match config.shard {
            Some(s) => Some(ShardId::new(s.ordinal, s.total)?),
            None => None,
        };

        let self_metrics = Arc::new(SelfMetricsWriter::new(
            shard.map_or(0, |s| s.ordinal),
            shard.map_or(1, |s| s.total),
        ));

        let label_allow_lists: HashMap<String, Vec<String>> = config
            .allow_lists
            .iter()
            .map(|(k, v)| (k.clone(), v.labels.clone()))
            .collect();
        let annotation_allow_lists: HashMap<String, Vec<String>> = config
            .allow_lists
            .iter()
            .map(|(k, v)| (k.clone(), v.annotations.clone()))
            .collect();
        let labels = AllowListMap::expand(&label_allow_lists, &kind_names);
        let annotations = AllowListMap::expand(&annotation_allow_lists, &kind_names);

        let mut writers: Vec<Arc<dyn ErasedKindWriter>> = Vec::with_capacity(kind_names.len() + 1);
        for name in &kind_names {
            let allow_labels = labels.keys_for(name).to_vec();
            let allow_annotations = annotations.keys_for(name).to_vec();
            info!(kind = name.as_str(), "building reflector(s)");

            if let Some(factory) = self.custom.iter().find(|f| f.name() == name) {
                let ctx = CustomResourceContext {
                    client: &self.client,
                    config,
                    filter: &filter,
                    shard,
                    self_metrics: &self_metrics,
                    cancel: &self.cancel,
                    allow_labels,
                    allow_annotations,
                };
                writers.push(factory.build(&ctx));
                continue;
            }

            let kind = KindName::from_str(name).expect("validated above");
            writers.push(build_kind_for(
                kind,
                allow_labels,
                allow_annotations,
                &self.client,
                config,
                &filter,
                shard,
                &self_metrics,
                &self.cancel,
            ));
        }

        if config.self_metrics {
            writers.push(self_metrics as Arc<dyn ErasedKindWriter>);
        }

        Ok(Exposer::new(writers))
    }
}

/// Unwraps a resolved family generator filter, panicking if it is null.
/// `Config::resolve_family_generator_filter` never returns `None`, so
/// reaching `None` here means a caller built an `Exposer` without going
/// through that resolution step — a programmer error, not a misconfiguration,
/// so this panics instead of surfacing a `ConfigError`.
fn require_family_generator_filter(filter: Option<FamilyGeneratorFilter>) -> FamilyGeneratorFilter {
    filter.expect(
        "family generator filter must be configured before Builder::build; this is a programmer error, not a runtime condition",
    )
}

/// Sorts and de-duplicates `enabled_kinds`, then
/// validates every name is either a registered custom-resource name or a
/// parseable built-in [`KindName`]; unknown names are a configuration error
/// reported before any reflector starts.
fn resolve_enabled_kind_names(enabled_kinds: &[String], custom_names: &[&str]) -> Result<Vec<String>, ConfigError> {
    if enabled_kinds.is_empty() {
        return Err(ConfigError::NoKindsEnabled);
    }
    let mut kind_names: Vec<String> = enabled_kinds.to_vec();
    kind_names.sort();
    kind_names.dedup();

    for name in &kind_names {
        let is_custom = custom_names.contains(&name.as_str());
        if !is_custom && KindName::from_str(name).is_err() {
            return Err(ConfigError::UnknownKind(name.clone()));
        }
    }
    Ok(kind_names)
}

fn namespaces_for(kind: KindName, scope: &NamespaceScope) -> Vec<Option<String>> {
    if !kind.namespaced() {
        return vec![None];
    }
    match scope {
        NamespaceScope::All => vec![None],
        NamespaceScope::Only(names) => names.iter().cloned().map(Some).collect(),
    }
}

/// Wires every `(namespace,)` reflector for one kind and returns the
/// type-erased writer the [`Exposer`] will hold.
#[allow(clippy::too_many_arguments)]
fn build_kind<K>(
    kind: KindName,
    key_fn: fn(&K) -> ObjectKey,
    uid_fn: fn(&K) -> String,
    identity: IdentityLabelFn<K>,
    generators: Vec<FamilyGenerator<K>>,
    client: &kube::Client,
    config: &Config,
    filter: &FamilyGeneratorFilter,
    shard: Option<ShardId>,
    self_metrics: &Arc<SelfMetricsWriter>,
    cancel: &CancellationToken,
) -> Arc<dyn ErasedKindWriter>
where
    K: Resource<DynamicType = ()>
        + Metadata<Ty = ObjectMeta>
        + Clone
        + Debug
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    let generators = filter.apply(generators);
    let composer = Composer::new(generators, identity);

    let counters = Arc::new(KindCounters::default());
    counters.set_using_server_cached_reads(config.use_server_cached_reads);
    self_metrics.register(kind.as_str(), Arc::clone(&counters));

    let namespaces = namespaces_for(kind, &config.namespace_scope);
    let mut stores = Vec::with_capacity(namespaces.len());

    for namespace in namespaces {
        let api = api_for::<K>(client.clone(), namespace.as_deref());
        let transport: Arc<dyn ListWatch<K>> = Arc::new(KubeListWatch::new(api));
        let transport: Arc<dyn ListWatch<K>> =
            Arc::new(InstrumentedListWatch::new(transport, Arc::clone(&counters)));
        let transport: Arc<dyn ListWatch<K>> = match shard {
            Some(s) => Arc::new(ShardedListWatch::new(transport, s, uid_fn)),
            None => transport,
        };

        let options = ListWatchOptions {
            namespace: namespace.clone(),
            field_selector: config.merged_field_selector(),
            limit: config.list_page_limit,
            use_server_cached_reads: config.use_server_cached_reads,
        };

        let writer = Writer::new(composer.clone());
        stores.push(writer.as_reader());

        let reflector = Reflector::new(transport, options, kind.as_str(), key_fn);
        let task_cancel = cancel.child_token();
        let kind_name = kind.as_str();
        let ns_label = namespace.clone().unwrap_or_else(|| "*".to_string());
        tokio::spawn(async move {
            reflector.run(writer, task_cancel).await;
            warn!(kind = kind_name, namespace = %ns_label, "reflector task exited");
        });
    }

    Arc::new(KindWriter::new(kind.as_str(), stores))
}

/// The per-kind dispatch: one arm per built-in [`KindName`], each binding
/// `build_kind` to its concrete `k8s-openapi` type and `ksm-kinds` catalog.
#[allow(clippy::too_many_arguments)]
fn build_kind_for(
    kind: KindName,
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
    client: &kube::Client,
    config: &Config,
    filter: &FamilyGeneratorFilter,
    shard: Option<ShardId>,
    self_metrics: &Arc<SelfMetricsWriter>,
    cancel: &CancellationToken,
) -> Arc<dyn ErasedKindWriter> {
    macro_rules! dispatch {
        ($module:ident) => {
            build_kind(
                kind,
                ksm_kinds::$module::key_fn,
                ksm_kinds::$module::uid,
                ksm_kinds::$module::identity(),
                ksm_kinds::$module::generators(allow_labels, allow_annotations),
                client,
                config,
                filter,
                shard,
                self_metrics,
                cancel,
            )
        };
    }

    match kind {
        KindName::CertificateSigningRequests => dispatch!(certificatesigningrequests),
        KindName::ClusterRoleBindings => dispatch!(clusterrolebindings),
        KindName::ClusterRoles => dispatch!(clusterroles),
        KindName::ConfigMaps => dispatch!(configmaps),
        KindName::CronJobs => dispatch!(cronjobs),
        KindName::DaemonSets => dispatch!(daemonsets),
        KindName::Deployments => dispatch!(deployments),
        KindName::Endpoints => dispatch!(endpoints),
        KindName::EndpointSlices => dispatch!(endpointslices),
        KindName::HorizontalPodAutoscalers => dispatch!(horizontalpodautoscalers),
        KindName::IngressClasses => dispatch!(ingressclasses),
        KindName::Ingresses => dispatch!(ingresses),
        KindName::Jobs => dispatch!(jobs),
        KindName::Leases => dispatch!(leases),
        KindName::LimitRanges => dispatch!(limitranges),
        KindName::MutatingWebhookConfigurations => dispatch!(mutatingwebhookconfigurations),
        KindName::Namespaces => dispatch!(namespaces),
        KindName::NetworkPolicies => dispatch!(networkpolicies),
        KindName::Nodes => dispatch!(nodes),
        KindName::PersistentVolumeClaims => dispatch!(persistentvolumeclaims),
        KindName::PersistentVolumes => dispatch!(persistentvolumes),
        KindName::PodDisruptionBudgets => dispatch!(poddisruptionbudgets),
        KindName::Pods => dispatch!(pods),
        KindName::ReplicaSets => dispatch!(replicasets),
        KindName::ReplicationControllers => dispatch!(replicationcontrollers),
        KindName::ResourceQuotas => dispatch!(resourcequotas),
        KindName::RoleBindings => dispatch!(rolebindings),
        KindName::Roles => dispatch!(roles),
        KindName::Secrets => dispatch!(secrets),
        KindName::ServiceAccounts => dispatch!(serviceaccounts),
        KindName::Services => dispatch!(services),
        KindName::StatefulSets => dispatch!(statefulsets),
        KindName::StorageClasses => dispatch!(storageclasses),
        KindName::ValidatingWebhookConfigurations => dispatch!(validatingwebhookconfigurations),
        KindName::VerticalPodAutoscalers => dispatch!(verticalpodautoscalers),
        KindName::VolumeAttachments => dispatch!(volumeattachments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamespaceScope;

    #[test]
    fn cluster_scoped_kind_ignores_namespace_scope() {
        let ns = namespaces_for(KindName::Nodes, &NamespaceScope::Only(vec!["ns1".into()]));
        assert_eq!(ns, vec![None]);
    }

    #[test]
    fn namespaced_kind_fans_out_over_only_list() {
        let scope = NamespaceScope::Only(vec!["ns1".into(), "ns2".into()]);
        let ns = namespaces_for(KindName::Pods, &scope);
        assert_eq!(ns, vec![Some("ns1".to_string()), Some("ns2".to_string())]);
    }

    #[test]
    fn namespaced_kind_defaults_to_cluster_wide() {
        let ns = namespaces_for(KindName::Pods, &NamespaceScope::All);
        assert_eq!(ns, vec![None]);
    }

    #[test]
    fn resolve_enabled_kind_names_sorts_and_dedups() {
        let names = vec!["pods".to_string(), "nodes".to_string(), "pods".to_string()];
        let resolved = resolve_enabled_kind_names(&names, &[]).unwrap();
        assert_eq!(resolved, vec!["nodes".to_string(), "pods".to_string()]);
    }

    #[test]
    fn resolve_enabled_kind_names_rejects_unknown_names() {
        let names = vec!["widgets".to_string()];
        let err = resolve_enabled_kind_names(&names, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind(n) if n == "widgets"));
    }

    #[test]
    fn resolve_enabled_kind_names_accepts_registered_custom_name() {
        let names = vec!["widgets".to_string()];
        let resolved = resolve_enabled_kind_names(&names, &["widgets"]).unwrap();
        assert_eq!(resolved, vec!["widgets".to_string()]);
    }

    #[test]
    fn resolve_enabled_kind_names_rejects_empty_set() {
        let err = resolve_enabled_kind_names(&[], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::NoKindsEnabled));
    }

    #[test]
    fn require_family_generator_filter_passes_through_when_set() {
        let filter = FamilyGeneratorFilter::allow_all().with_deny_list(["a"]);
        let resolved = require_family_generator_filter(Some(filter));
        assert_eq!(resolved.apply(vec![]).len(), 0);
    }

    #[test]
    #[should_panic(expected = "family generator filter must be configured")]
    fn require_family_generator_filter_panics_when_null() {
        require_family_generator_filter(None);
    }
}
