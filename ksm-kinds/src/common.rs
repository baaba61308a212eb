//! Per-kind helpers shared by every catalog module.
//!
//! Every built-in kind object carries a `metadata: ObjectMeta` field
//! directly (no trait indirection needed — these are all concrete
//! `k8s-openapi` structs), so the helpers below just take `&ObjectMeta`
//! rather than the object itself.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference, Time};
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::sample::Sample;
use ksm_core::{allowlist, Stability};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds the identity label function for a namespaced kind: `namespace`
/// then `object_label`.
pub fn namespaced_identity<K: 'static>(
    object_label: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> IdentityLabelFn<K> {
    Arc::new(move |o: &K| {
        let m = meta(o);
        vec![
            ("namespace".to_string(), m.namespace.clone().unwrap_or_default()),
            (object_label.to_string(), m.name.clone().unwrap_or_default()),
        ]
    })
}

/// Identity label function for a cluster-scoped kind: just `object_label`.
pub fn cluster_scoped_identity<K: 'static>(
    object_label: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> IdentityLabelFn<K> {
    Arc::new(move |o: &K| {
        let m = meta(o);
        vec![(object_label.to_string(), m.name.clone().unwrap_or_default())]
    })
}

/// Same as [`namespaced_identity`], with a trailing `uid` label. Used by the
/// kinds whose identity a scraper conventionally cross-references by UID
/// (pods, persistent volume claims) rather than by name/namespace alone.
pub fn namespaced_identity_with_uid<K: 'static>(
    object_label: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> IdentityLabelFn<K> {
    Arc::new(move |o: &K| {
        let m = meta(o);
        vec![
            ("namespace".to_string(), m.namespace.clone().unwrap_or_default()),
            (object_label.to_string(), m.name.clone().unwrap_or_default()),
            ("uid".to_string(), uid_of(m)),
        ]
    })
}

/// Same as [`cluster_scoped_identity`], with a trailing `uid` label. Used by
/// the cluster-scoped kinds a scraper conventionally cross-references by UID
/// (nodes, persistent volumes, namespaces).
pub fn cluster_scoped_identity_with_uid<K: 'static>(
    object_label: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> IdentityLabelFn<K> {
    Arc::new(move |o: &K| {
        let m = meta(o);
        vec![
            (object_label.to_string(), m.name.clone().unwrap_or_default()),
            ("uid".to_string(), uid_of(m)),
        ]
    })
}

/// A `kube_<kind>_created` family: Unix seconds of `creationTimestamp`, one
/// sample if the timestamp is set, none otherwise.
pub fn created_family<K: 'static>(
    metric_name: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> FamilyGenerator<K> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            metric_name,
            "Unix creation timestamp",
            Stability::Stable,
        ),
        move |o: &K| {
            creation_timestamp(meta(o))
                .map(|t| Sample::new("", quantity::unix_seconds(t)))
                .into_iter()
                .collect()
        },
    )
}

/// A `kube_<kind>_labels` family, wrapping the allow-listed label projection.
pub fn labels_family<K: 'static>(
    metric_name: &'static str,
    allowed_keys: Vec<String>,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> FamilyGenerator<K> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            metric_name,
            "Kubernetes labels converted to Prometheus labels.",
            Stability::Stable,
        ),
        move |o: &K| {
            let map = as_map(&meta(o).labels);
            allowlist::allow_listed_samples("label_", &allowed_keys, &map)
        },
    )
}

/// A `kube_<kind>_annotations` family, analogous to [`labels_family`].
pub fn annotations_family<K: 'static>(
    metric_name: &'static str,
    allowed_keys: Vec<String>,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> FamilyGenerator<K> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            metric_name,
            "Kubernetes annotations converted to Prometheus labels.",
            Stability::Stable,
        ),
        move |o: &K| {
            let map = as_map(&meta(o).annotations);
            allowlist::allow_listed_samples("annotation_", &allowed_keys, &map)
        },
    )
}

/// A `kube_<kind>_owner` family: one sample per owner reference.
pub fn owner_family<K: 'static>(
    metric_name: &'static str,
    meta: impl Fn(&K) -> &ObjectMeta + Send + Sync + 'static,
) -> FamilyGenerator<K> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            metric_name,
            "Information about the Kubernetes object's owner references.",
            Stability::Stable,
        ),
        move |o: &K| owner_samples(meta(o).owner_references.as_deref().unwrap_or(&[])),
    )
}

pub fn owner_samples(owners: &[OwnerReference]) -> Vec<Sample> {
    owners
        .iter()
        .map(|owner| {
            Sample::new("", 1.0)
                .with_label("owner_kind", owner.kind.clone())
                .with_label("owner_name", owner.name.clone())
                .with_label(
                    "owner_is_controller",
                    owner.controller.map(|b| b.to_string()).unwrap_or_default(),
                )
        })
        .collect()
}

/// A condition-bearing family: `extract` maps the object to
/// `(condition_type, status_string)` pairs; each pair expands to the
/// mandatory `{true,false,unknown}` triplet.
pub fn condition_family<K: 'static>(
    metric_name: &'static str,
    help: &'static str,
    extract: impl Fn(&K) -> Vec<(String, String)> + Send + Sync + 'static,
) -> FamilyGenerator<K> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(metric_name, help, Stability::Stable),
        move |o: &K| {
            extract(o)
                .into_iter()
                .flat_map(|(ty, status)| {
                    ksm_core::generator::condition_triplet(&status)
                        .into_iter()
                        .map(move |s| s.with_label("condition", ty.clone()))
                })
                .collect()
        },
    )
}

pub fn as_map(m: &Option<std::collections::BTreeMap<String, String>>) -> BTreeMap<String, String> {
    m.clone().unwrap_or_default()
}

pub fn creation_timestamp(meta: &ObjectMeta) -> Option<i64> {
    meta.creation_timestamp.as_ref().map(|Time(t)| t.timestamp())
}

pub fn uid_of(meta: &ObjectMeta) -> String {
    meta.uid.clone().unwrap_or_default()
}

/// Parses a Kubernetes `Quantity` string into its canonical decimal value
/// (CPU in cores, memory/storage in bytes).
/// Supports the SI (`k`,`M`,`G`,`T`,`P`,`E`,`m`,`u`,`n`) and binary
/// (`Ki`,`Mi`,`Gi`,`Ti`,`Pi`,`Ei`) suffixes defined by
/// `k8s.io/apimachinery/pkg/api/resource`.
pub fn quantity_to_f64(q: &k8s_openapi::apimachinery::pkg::api::resource::Quantity) -> f64 {
    let raw = q.0.trim();
    let split_at = raw.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split_at);
    let base: f64 = number.parse().unwrap_or(0.0);
    let scale = match suffix {
        "" => 1.0,
        "n" => 1e-9,
        "u" => 1e-6,
        "m" => 1e-3,
        "k" | "K" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        "P" => 1e15,
        "E" => 1e18,
        "Ki" => 1024.0,
        "Mi" => 1024f64.powi(2),
        "Gi" => 1024f64.powi(3),
        "Ti" => 1024f64.powi(4),
        "Pi" => 1024f64.powi(5),
        "Ei" => 1024f64.powi(6),
        _ => 1.0,
    };
    base * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Obj {
        meta: ObjectMeta,
    }

    fn obj_with_labels() -> Obj {
        let mut labels = BTreeMap::new();
        labels.insert("team".to_string(), "payments".to_string());
        Obj {
            meta: ObjectMeta {
                namespace: Some("ns4".to_string()),
                name: Some("thing1".to_string()),
                labels: Some(labels),
                uid: Some("uid-4".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn namespaced_identity_prepends_namespace_then_name() {
        let identity = namespaced_identity::<Obj>("widget", |o| &o.meta);
        let labels = identity(&obj_with_labels());
        assert_eq!(
            labels,
            vec![
                ("namespace".to_string(), "ns4".to_string()),
                ("widget".to_string(), "thing1".to_string()),
            ]
        );
    }

    #[test]
    fn namespaced_identity_with_uid_appends_uid() {
        let identity = namespaced_identity_with_uid::<Obj>("widget", |o| &o.meta);
        let labels = identity(&obj_with_labels());
        assert_eq!(
            labels,
            vec![
                ("namespace".to_string(), "ns4".to_string()),
                ("widget".to_string(), "thing1".to_string()),
                ("uid".to_string(), "uid-4".to_string()),
            ]
        );
    }

    #[test]
    fn cluster_scoped_identity_with_uid_appends_uid() {
        let identity = cluster_scoped_identity_with_uid::<Obj>("widget", |o| &o.meta);
        let labels = identity(&obj_with_labels());
        assert_eq!(
            labels,
            vec![
                ("widget".to_string(), "thing1".to_string()),
                ("uid".to_string(), "uid-4".to_string()),
            ]
        );
    }

    #[test]
    fn labels_family_emits_only_allow_listed_keys() {
        let gen = labels_family::<Obj>("kube_widget_labels", vec!["team".to_string()], |o| &o.meta);
        let identity = namespaced_identity::<Obj>("widget", |o| &o.meta);
        let composer = ksm_core::Composer::new(vec![gen], identity);
        let families = composer.compose(&obj_with_labels());
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].samples.len(), 1);
        assert!(families[0].samples[0]
            .labels()
            .contains(&("label_team".to_string(), "payments".to_string())));
    }

    #[test]
    fn quantity_parses_si_and_binary_suffixes() {
        use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
        assert_eq!(quantity_to_f64(&Quantity("4.3".to_string())), 4.3);
        assert_eq!(quantity_to_f64(&Quantity("2.1G".to_string())), 2.1e9);
        assert_eq!(quantity_to_f64(&Quantity("500M".to_string())), 5e8);
        assert_eq!(quantity_to_f64(&Quantity("1Ki".to_string())), 1024.0);
    }

    #[test]
    fn owner_samples_carries_controller_flag() {
        let owners = vec![OwnerReference {
            kind: "ReplicaSet".to_string(),
            name: "rs-1".to_string(),
            controller: Some(true),
            ..Default::default()
        }];
        let samples = owner_samples(&owners);
        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[0].labels(),
            &[
                ("owner_kind".to_string(), "ReplicaSet".to_string()),
                ("owner_name".to_string(), "rs-1".to_string()),
                ("owner_is_controller".to_string(), "true".to_string()),
            ]
        );
    }
}
