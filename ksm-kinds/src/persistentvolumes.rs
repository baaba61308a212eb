//! `persistentvolumes` (full depth).

use crate::common::{annotations_family, cluster_scoped_identity_with_uid, created_family, labels_family, owner_family, quantity_to_f64};
use k8s_openapi::api::core::v1::PersistentVolume;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "persistentvolumes";

pub fn key_fn(obj: &PersistentVolume) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &PersistentVolume) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<PersistentVolume> {
    cluster_scoped_identity_with_uid("persistentvolume", |o: &PersistentVolume| &o.metadata)
}

fn info_family() -> FamilyGenerator<PersistentVolume> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolume_info",
            "Information about persistent volume.",
            Stability::Stable,
        ),
        |o: &PersistentVolume| {
            let spec = o.spec.as_ref();
            vec![Sample::new("", 1.0)
                .with_label(
                    "storageclass",
                    spec.and_then(|s| s.storage_class_name.clone()).unwrap_or_default(),
                )
                .with_label(
                    "reclaim_policy",
                    spec.and_then(|s| s.persistent_volume_reclaim_policy.clone()).unwrap_or_default(),
                )]
        },
    )
}

fn status_phase_family() -> FamilyGenerator<PersistentVolume> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolume_status_phase",
            "The phase indicates if a volume is available, bound to a claim, or released by a claim.",
            Stability::Stable,
        ),
        |o: &PersistentVolume| {
            const PHASES: [&str; 4] = ["Available", "Bound", "Released", "Failed"];
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

fn capacity_family() -> FamilyGenerator<PersistentVolume> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolume_capacity_bytes",
            "Persistent volume capacity in bytes.",
            Stability::Stable,
        ),
        |o: &PersistentVolume| {
            o.spec
                .as_ref()
                .and_then(|s| s.capacity.as_ref())
                .and_then(|capacity| capacity.get("storage"))
                .map(|q| vec![Sample::new("", quantity_to_f64(q))])
                .unwrap_or_default()
        },
    )
}

fn claim_ref_family() -> FamilyGenerator<PersistentVolume> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_persistentvolume_claim_ref",
            "Information about the bound claim of this persistent volume.",
            Stability::Stable,
        ),
        |o: &PersistentVolume| {
            o.spec
                .as_ref()
                .and_then(|s| s.claim_ref.as_ref())
                .map(|c| {
                    vec![Sample::new("", 1.0)
                        .with_label("name", c.name.clone().unwrap_or_default())
                        .with_label("claim_namespace", c.namespace.clone().unwrap_or_default())]
                })
                .unwrap_or_default()
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<PersistentVolume>> {
    vec![
        info_family(),
        status_phase_family(),
        capacity_family(),
        claim_ref_family(),
        created_family("kube_persistentvolume_created", |o: &PersistentVolume| &o.metadata),
        labels_family("kube_persistentvolume_labels", allow_labels, |o: &PersistentVolume| &o.metadata),
        annotations_family(
            "kube_persistentvolume_annotations",
            allow_annotations,
            |o: &PersistentVolume| &o.metadata,
        ),
        owner_family("kube_persistentvolume_owner", |o: &PersistentVolume| &o.metadata),
    ]
}
