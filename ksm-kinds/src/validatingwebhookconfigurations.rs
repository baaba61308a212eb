//! `validatingwebhookconfigurations` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::admissionregistration::v1::ValidatingWebhookConfiguration;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "validatingwebhookconfigurations";

pub fn key_fn(obj: &ValidatingWebhookConfiguration) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ValidatingWebhookConfiguration) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ValidatingWebhookConfiguration> {
    Arc::new(|o: &ValidatingWebhookConfiguration| {
        vec![(
            "validatingwebhookconfiguration".to_string(),
            o.metadata.name.clone().unwrap_or_default(),
        )]
    })
}

fn webhook_count_family() -> FamilyGenerator<ValidatingWebhookConfiguration> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_validatingwebhookconfiguration_webhook_count",
            "Number of webhooks registered by this configuration.",
            Stability::Stable,
        ),
        |o: &ValidatingWebhookConfiguration| {
            vec![Sample::new("", o.webhooks.as_ref().map(|w| w.len()).unwrap_or(0) as f64)]
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<ValidatingWebhookConfiguration>> {
    vec![
        webhook_count_family(),
        created_family("kube_validatingwebhookconfiguration_created", |o: &ValidatingWebhookConfiguration| {
            &o.metadata
        }),
        labels_family(
            "kube_validatingwebhookconfiguration_labels",
            allow_labels,
            |o: &ValidatingWebhookConfiguration| &o.metadata,
        ),
        annotations_family(
            "kube_validatingwebhookconfiguration_annotations",
            allow_annotations,
            |o: &ValidatingWebhookConfiguration| &o.metadata,
        ),
    ]
}
