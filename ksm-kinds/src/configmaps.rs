//! `configmaps` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::core::v1::ConfigMap;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "configmaps";

pub fn key_fn(obj: &ConfigMap) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ConfigMap) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ConfigMap> {
    namespaced_identity("configmap", |o: &ConfigMap| &o.metadata)
}

fn data_keys_family() -> FamilyGenerator<ConfigMap> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_configmap_data_keys",
            "The number of keys in the configmap's data.",
            Stability::Stable,
        ),
        |o: &ConfigMap| vec![Sample::new("", o.data.as_ref().map(|d| d.len()).unwrap_or(0) as f64)],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<ConfigMap>> {
    vec![
        data_keys_family(),
        created_family("kube_configmap_created", |o: &ConfigMap| &o.metadata),
        labels_family("kube_configmap_labels", allow_labels, |o: &ConfigMap| &o.metadata),
        annotations_family("kube_configmap_annotations", allow_annotations, |o: &ConfigMap| &o.metadata),
    ]
}
