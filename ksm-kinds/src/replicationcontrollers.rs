//! `replicationcontrollers` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::core::v1::ReplicationController;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "replicationcontrollers";

pub fn key_fn(obj: &ReplicationController) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ReplicationController) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ReplicationController> {
    namespaced_identity("replicationcontroller", |o: &ReplicationController| &o.metadata)
}

fn status_replicas_family() -> FamilyGenerator<ReplicationController> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_replicationcontroller_status_replicas",
            "The number of replicas per replication controller.",
            Stability::Stable,
        ),
        |o: &ReplicationController| vec![Sample::new("", o.status.as_ref().map(|s| s.replicas).unwrap_or(0) as f64)],
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<ReplicationController>> {
    vec![
        status_replicas_family(),
        created_family("kube_replicationcontroller_created", |o: &ReplicationController| &o.metadata),
        labels_family(
            "kube_replicationcontroller_labels",
            allow_labels,
            |o: &ReplicationController| &o.metadata,
        ),
        annotations_family(
            "kube_replicationcontroller_annotations",
            allow_annotations,
            |o: &ReplicationController| &o.metadata,
        ),
    ]
}
