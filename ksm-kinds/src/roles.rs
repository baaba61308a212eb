//! `roles` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::rbac::v1::Role;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "roles";

pub fn key_fn(obj: &Role) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Role) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Role> {
    namespaced_identity("role", |o: &Role| &o.metadata)
}

fn rule_count_family() -> FamilyGenerator<Role> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_role_rule_count",
            "Number of policy rules on this role.",
            Stability::Stable,
        ),
        |o: &Role| vec![Sample::new("", o.rules.as_ref().map(|r| r.len()).unwrap_or(0) as f64)],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Role>> {
    vec![
        rule_count_family(),
        created_family("kube_role_created", |o: &Role| &o.metadata),
        labels_family("kube_role_labels", allow_labels, |o: &Role| &o.metadata),
        annotations_family("kube_role_annotations", allow_annotations, |o: &Role| &o.metadata),
    ]
}
