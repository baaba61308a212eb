//! `rolebindings` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::rbac::v1::RoleBinding;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "rolebindings";

pub fn key_fn(obj: &RoleBinding) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &RoleBinding) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<RoleBinding> {
    namespaced_identity("rolebinding", |o: &RoleBinding| &o.metadata)
}

fn info_family() -> FamilyGenerator<RoleBinding> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_rolebinding_info",
            "Information about role binding.",
            Stability::Stable,
        ),
        |o: &RoleBinding| vec![Sample::new("", 1.0).with_label("roleref_name", o.role_ref.name.clone())],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<RoleBinding>> {
    vec![
        info_family(),
        created_family("kube_rolebinding_created", |o: &RoleBinding| &o.metadata),
        labels_family("kube_rolebinding_labels", allow_labels, |o: &RoleBinding| &o.metadata),
        annotations_family("kube_rolebinding_annotations", allow_annotations, |o: &RoleBinding| &o.metadata),
    ]
}
