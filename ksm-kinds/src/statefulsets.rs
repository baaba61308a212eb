//! `statefulsets` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::apps::v1::StatefulSet;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::sample::Sample;
use ksm_core::key::ObjectKey;
use ksm_core::Stability;

pub const NAME: &str = "statefulsets";

pub fn key_fn(obj: &StatefulSet) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &StatefulSet) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<StatefulSet> {
    namespaced_identity("statefulset", |o: &StatefulSet| &o.metadata)
}

fn spec_replicas_family() -> FamilyGenerator<StatefulSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_statefulset_replicas",
            "Number of desired pods for a StatefulSet.",
            Stability::Stable,
        ),
        |o: &StatefulSet| {
            o.spec
                .as_ref()
                .and_then(|s| s.replicas)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn status_replicas_family() -> FamilyGenerator<StatefulSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_statefulset_status_replicas",
            "The number of replicas per StatefulSet.",
            Stability::Stable,
        ),
        |o: &StatefulSet| vec![Sample::new("", o.status.as_ref().map(|s| s.replicas).unwrap_or(0) as f64)],
    )
}

fn status_ready_replicas_family() -> FamilyGenerator<StatefulSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_statefulset_status_replicas_ready",
            "The number of ready replicas per StatefulSet.",
            Stability::Stable,
        ),
        |o: &StatefulSet| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0) as f64,
            )]
        },
    )
}

fn status_current_revision_family() -> FamilyGenerator<StatefulSet> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_statefulset_status_current_revision",
            "Indicates the version of the StatefulSet used to generate Pods in the sequence [0,currentReplicas).",
            Stability::Stable,
        ),
        |o: &StatefulSet| {
            o.status
                .as_ref()
                .and_then(|s| s.current_revision.clone())
                .map(|rev| Sample::new("", 1.0).with_label("revision", rev))
                .into_iter()
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<StatefulSet>> {
    vec![
        spec_replicas_family(),
        status_replicas_family(),
        status_ready_replicas_family(),
        status_current_revision_family(),
        created_family("kube_statefulset_created", |o: &StatefulSet| &o.metadata),
        labels_family("kube_statefulset_labels", allow_labels, |o: &StatefulSet| &o.metadata),
        annotations_family("kube_statefulset_annotations", allow_annotations, |o: &StatefulSet| &o.metadata),
        owner_family("kube_statefulset_owner", |o: &StatefulSet| &o.metadata),
    ]
}
