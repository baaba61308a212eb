//! `clusterroles` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::rbac::v1::ClusterRole;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "clusterroles";

pub fn key_fn(obj: &ClusterRole) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ClusterRole) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ClusterRole> {
    Arc::new(|o: &ClusterRole| vec![("clusterrole".to_string(), o.metadata.name.clone().unwrap_or_default())])
}

fn rule_count_family() -> FamilyGenerator<ClusterRole> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_clusterrole_rule_count",
            "Number of policy rules on this cluster role.",
            Stability::Stable,
        ),
        |o: &ClusterRole| vec![Sample::new("", o.rules.as_ref().map(|r| r.len()).unwrap_or(0) as f64)],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<ClusterRole>> {
    vec![
        rule_count_family(),
        created_family("kube_clusterrole_created", |o: &ClusterRole| &o.metadata),
        labels_family("kube_clusterrole_labels", allow_labels, |o: &ClusterRole| &o.metadata),
        annotations_family("kube_clusterrole_annotations", allow_annotations, |o: &ClusterRole| &o.metadata),
    ]
}
