//! `replicasets` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::apps::v1::ReplicaSet;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "replicasets";

pub fn key_fn(obj: &ReplicaSet) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ReplicaSet) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ReplicaSet> {
    namespaced_identity("replicaset", |o: &ReplicaSet| &o.metadata)
}

fn spec_replicas_family() -> FamilyGenerator<ReplicaSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_replicaset_spec_replicas",
            "Number of desired pods for a ReplicaSet.",
            Stability::Stable,
        ),
        |o: &ReplicaSet| {
            o.spec
                .as_ref()
                .and_then(|s| s.replicas)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn status_replicas_family() -> FamilyGenerator<ReplicaSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_replicaset_status_replicas",
            "The number of replicas per ReplicaSet.",
            Stability::Stable,
        ),
        |o: &ReplicaSet| vec![Sample::new("", o.status.as_ref().map(|s| s.replicas).unwrap_or(0) as f64)],
    )
}

fn status_ready_replicas_family() -> FamilyGenerator<ReplicaSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_replicaset_status_ready_replicas",
            "The number of ready replicas per ReplicaSet.",
            Stability::Stable,
        ),
        |o: &ReplicaSet| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0) as f64,
            )]
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<ReplicaSet>> {
    vec![
        spec_replicas_family(),
        status_replicas_family(),
        status_ready_replicas_family(),
        created_family("kube_replicaset_created", |o: &ReplicaSet| &o.metadata),
        labels_family("kube_replicaset_labels", allow_labels, |o: &ReplicaSet| &o.metadata),
        annotations_family("kube_replicaset_annotations", allow_annotations, |o: &ReplicaSet| &o.metadata),
        owner_family("kube_replicaset_owner", |o: &ReplicaSet| &o.metadata),
    ]
}
