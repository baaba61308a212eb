//! `persistentvolumeclaims` (full depth).

use crate::common::{
    annotations_family, created_family, labels_family, namespaced_identity_with_uid, owner_family, quantity_to_f64,
};
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "persistentvolumeclaims";

pub fn key_fn(obj: &PersistentVolumeClaim) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &PersistentVolumeClaim) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<PersistentVolumeClaim> {
    namespaced_identity_with_uid("persistentvolumeclaim", |o: &PersistentVolumeClaim| &o.metadata)
}

fn info_family() -> FamilyGenerator<PersistentVolumeClaim> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolumeclaim_info",
            "Information about persistent volume claim.",
            Stability::Stable,
        ),
        |o: &PersistentVolumeClaim| {
            let spec = o.spec.as_ref();
            vec![Sample::new("", 1.0)
                .with_label(
                    "storageclass",
                    spec.and_then(|s| s.storage_class_name.clone()).unwrap_or_default(),
                )
                .with_label("volumename", spec.and_then(|s| s.volume_name.clone()).unwrap_or_default())]
        },
    )
}

fn status_phase_family() -> FamilyGenerator<PersistentVolumeClaim> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolumeclaim_status_phase",
            "The phase the persistent volume claim is currently in.",
            Stability::Stable,
        ),
        |o: &PersistentVolumeClaim| {
            const PHASES: [&str; 3] = ["Pending", "Bound", "Lost"];
            let current = o.status.as_ref().and_then(|s| s.phase.clone()).unwrap_or_default();
            PHASES
                .iter()
                .map(|phase| {
                    Sample::new("", if *phase == current { 1.0 } else { 0.0 }).with_label("phase", *phase)
                })
                .collect()
        },
    )
}

fn resource_requests_family() -> FamilyGenerator<PersistentVolumeClaim> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolumeclaim_resource_requests_storage_bytes",
            "The capacity of storage requested by the persistent volume claim.",
            Stability::Stable,
        ),
        |o: &PersistentVolumeClaim| {
            o.spec
                .as_ref()
                .and_then(|s| s.resources.as_ref())
                .and_then(|r| r.requests.as_ref())
                .and_then(|requests| requests.get("storage"))
                .map(|q| vec![Sample::new("", quantity_to_f64(q))])
                .unwrap_or_default()
        },
    )
}

fn access_mode_family() -> FamilyGenerator<PersistentVolumeClaim> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolumeclaim_access_mode",
            "The access mode(s) specified by the persistent volume claim.",
            Stability::Stable,
        ),
        |o: &PersistentVolumeClaim| {
            o.spec
                .as_ref()
                .and_then(|s| s.access_modes.as_ref())
                .map(|modes| modes.iter().map(|m| Sample::new("", 1.0).with_label("access_mode", m.clone())).collect())
                .unwrap_or_default()
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<PersistentVolumeClaim>> {
    vec![
        info_family(),
        status_phase_family(),
        resource_requests_family(),
        access_mode_family(),
        created_family("kube_persistentvolumeclaim_created", |o: &PersistentVolumeClaim| &o.metadata),
        labels_family(
            "kube_persistentvolumeclaim_labels",
            allow_labels,
            |o: &PersistentVolumeClaim| &o.metadata,
        ),
        annotations_family(
            "kube_persistentvolumeclaim_annotations",
            allow_annotations,
            |o: &PersistentVolumeClaim| &o.metadata,
        ),
        owner_family("kube_persistentvolumeclaim_owner", |o: &PersistentVolumeClaim| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{PersistentVolumeClaimSpec, PersistentVolumeClaimStatus, VolumeResourceRequirements};
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;
    use std::collections::BTreeMap;

    #[test]
    fn status_phase_family_marks_exactly_one_phase() {
        let obj = PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some("data".into()),
                namespace: Some("ns1".into()),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec!["ReadWriteOnce".into()]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(BTreeMap::from([("storage".to_string(), Quantity("10Gi".into()))])),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            status: Some(PersistentVolumeClaimStatus {
                phase: Some("Bound".into()),
                ..Default::default()
            }),
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&obj);
        let phase = families.iter().find(|f| f.name == "kube_persistentvolumeclaim_status_phase").unwrap();
        let bound = phase.samples.iter().filter(|s| s.value == 1.0).count();
        assert_eq!(bound, 1);
    }
}
