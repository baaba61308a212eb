//! `limitranges` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::core::v1::LimitRange;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "limitranges";

pub fn key_fn(obj: &LimitRange) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &LimitRange) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<LimitRange> {
    namespaced_identity("limitrange", |o: &LimitRange| &o.metadata)
}

fn item_count_family() -> FamilyGenerator<LimitRange> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_limitrange_item_count",
            "Number of limit range items configured on this limit range.",
            Stability::Stable,
        ),
        |o: &LimitRange| {
            vec![Sample::new(
                "",
                o.spec.as_ref().and_then(|s| s.limits.as_ref()).map(|l| l.len()).unwrap_or(0) as f64,
            )]
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<LimitRange>> {
    vec![
        item_count_family(),
        created_family("kube_limitrange_created", |o: &LimitRange| &o.metadata),
        labels_family("kube_limitrange_labels", allow_labels, |o: &LimitRange| &o.metadata),
        annotations_family("kube_limitrange_annotations", allow_annotations, |o: &LimitRange| &o.metadata),
    ]
}
