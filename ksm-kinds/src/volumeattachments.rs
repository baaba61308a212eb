//! `volumeattachments` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::storage::v1::VolumeAttachment;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "volumeattachments";

pub fn key_fn(obj: &VolumeAttachment) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &VolumeAttachment) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<VolumeAttachment> {
    Arc::new(|o: &VolumeAttachment| vec![("volumeattachment".to_string(), o.metadata.name.clone().unwrap_or_default())])
}

fn status_attached_family() -> FamilyGenerator<VolumeAttachment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_volumeattachment_status_attached",
            "Whether the volume is successfully attached.",
            Stability::Stable,
        ),
        |o: &VolumeAttachment| {
            vec![Sample::new(
                "",
                quantity::bool_to_f64(o.status.as_ref().map(|s| s.attached).unwrap_or(false)),
            )
            .with_label("attacher", o.spec.attacher.clone())
            .with_label("node", o.spec.node_name.clone())]
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<VolumeAttachment>> {
    vec![
        status_attached_family(),
        created_family("kube_volumeattachment_created", |o: &VolumeAttachment| &o.metadata),
        labels_family("kube_volumeattachment_labels", allow_labels, |o: &VolumeAttachment| &o.metadata),
        annotations_family(
            "kube_volumeattachment_annotations",
            allow_annotations,
            |o: &VolumeAttachment| &o.metadata,
        ),
    ]
}
