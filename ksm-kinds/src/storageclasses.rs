//! `storageclasses` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::storage::v1::StorageClass;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "storageclasses";

pub fn key_fn(obj: &StorageClass) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &StorageClass) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<StorageClass> {
    Arc::new(|o: &StorageClass| vec![("storageclass".to_string(), o.metadata.name.clone().unwrap_or_default())])
}

fn info_family() -> FamilyGenerator<StorageClass> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_storageclass_info",
            "Information about storageclass.",
            Stability::Stable,
        ),
        |o: &StorageClass| {
            vec![Sample::new("", 1.0)
                .with_label("provisioner", o.provisioner.clone())
                .with_label("reclaim_policy", o.reclaim_policy.clone().unwrap_or_default())
                .with_label("volume_binding_mode", o.volume_binding_mode.clone().unwrap_or_default())]
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<StorageClass>> {
    vec![
        info_family(),
        created_family("kube_storageclass_created", |o: &StorageClass| &o.metadata),
        labels_family("kube_storageclass_labels", allow_labels, |o: &StorageClass| &o.metadata),
        annotations_family("kube_storageclass_annotations", allow_annotations, |o: &StorageClass| &o.metadata),
    ]
}
