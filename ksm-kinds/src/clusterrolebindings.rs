//! `clusterrolebindings` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::rbac::v1::ClusterRoleBinding;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "clusterrolebindings";

pub fn key_fn(obj: &ClusterRoleBinding) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ClusterRoleBinding) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ClusterRoleBinding> {
    Arc::new(|o: &ClusterRoleBinding| {
        vec![("clusterrolebinding".to_string(), o.metadata.name.clone().unwrap_or_default())]
    })
}

fn info_family() -> FamilyGenerator<ClusterRoleBinding> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_clusterrolebinding_info",
            "Information about cluster role binding.",
            Stability::Stable,
        ),
        |o: &ClusterRoleBinding| vec![Sample::new("", 1.0).with_label("roleref_name", o.role_ref.name.clone())],
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<ClusterRoleBinding>> {
    vec![
        info_family(),
        created_family("kube_clusterrolebinding_created", |o: &ClusterRoleBinding| &o.metadata),
        labels_family("kube_clusterrolebinding_labels", allow_labels, |o: &ClusterRoleBinding| &o.metadata),
        annotations_family(
            "kube_clusterrolebinding_annotations",
            allow_annotations,
            |o: &ClusterRoleBinding| &o.metadata,
        ),
    ]
}
