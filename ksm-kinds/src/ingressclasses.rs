//! `ingressclasses` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, created_family, labels_family};
use k8s_openapi::api::networking::v1::IngressClass;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "ingressclasses";

pub fn key_fn(obj: &IngressClass) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &IngressClass) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<IngressClass> {
    Arc::new(|o: &IngressClass| vec![("ingressclass".to_string(), o.metadata.name.clone().unwrap_or_default())])
}

fn info_family() -> FamilyGenerator<IngressClass> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_ingressclass_info",
            "Information about ingressclass.",
            Stability::Stable,
        ),
        |o: &IngressClass| {
            vec![Sample::new("", 1.0)
                .with_label("controller", o.spec.as_ref().and_then(|s| s.controller.clone()).unwrap_or_default())]
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<IngressClass>> {
    vec![
        info_family(),
        created_family("kube_ingressclass_created", |o: &IngressClass| &o.metadata),
        labels_family("kube_ingressclass_labels", allow_labels, |o: &IngressClass| &o.metadata),
        annotations_family("kube_ingressclass_annotations", allow_annotations, |o: &IngressClass| &o.metadata),
    ]
}
