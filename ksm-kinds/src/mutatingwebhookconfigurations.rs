//! `mutatingwebhookconfigurations` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::admissionregistration::v1::MutatingWebhookConfiguration;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "mutatingwebhookconfigurations";

pub fn key_fn(obj: &MutatingWebhookConfiguration) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &MutatingWebhookConfiguration) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<MutatingWebhookConfiguration> {
    Arc::new(|o: &MutatingWebhookConfiguration| {
        vec![(
            "mutatingwebhookconfiguration".to_string(),
            o.metadata.name.clone().unwrap_or_default(),
        )]
    })
}

fn webhook_count_family() -> FamilyGenerator<MutatingWebhookConfiguration> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_mutatingwebhookconfiguration_webhook_count",
            "Number of webhooks registered by this configuration.",
            Stability::Stable,
        ),
        |o: &MutatingWebhookConfiguration| vec![Sample::new("", o.webhooks.as_ref().map(|w| w.len()).unwrap_or(0) as f64)],
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<MutatingWebhookConfiguration>> {
    vec![
        webhook_count_family(),
        created_family("kube_mutatingwebhookconfiguration_created", |o: &MutatingWebhookConfiguration| &o.metadata),
        labels_family(
            "kube_mutatingwebhookconfiguration_labels",
            allow_labels,
            |o: &MutatingWebhookConfiguration| &o.metadata,
        ),
        annotations_family(
            "kube_mutatingwebhookconfiguration_annotations",
            allow_annotations,
            |o: &MutatingWebhookConfiguration| &o.metadata,
        ),
    ]
}
