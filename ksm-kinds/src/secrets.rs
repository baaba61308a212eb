//! `secrets` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::core::v1::Secret;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "secrets";

pub fn key_fn(obj: &Secret) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Secret) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Secret> {
    namespaced_identity("secret", |o: &Secret| &o.metadata)
}

/// Emits the secret's type only — never its data or stringData.
fn info_family() -> FamilyGenerator<Secret> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_secret_info", "Information about secret.", Stability::Stable),
        |o: &Secret| vec![Sample::new("", 1.0).with_label("type", o.type_.clone().unwrap_or_default())],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Secret>> {
    vec![
        info_family(),
        created_family("kube_secret_created", |o: &Secret| &o.metadata),
        labels_family("kube_secret_labels", allow_labels, |o: &Secret| &o.metadata),
        annotations_family("kube_secret_annotations", allow_annotations, |o: &Secret| &o.metadata),
    ]
}
