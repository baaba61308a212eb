//! `poddisruptionbudgets` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "poddisruptionbudgets";

pub fn key_fn(obj: &PodDisruptionBudget) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &PodDisruptionBudget) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<PodDisruptionBudget> {
    namespaced_identity("poddisruptionbudget", |o: &PodDisruptionBudget| &o.metadata)
}

macro_rules! status_field_family {
    ($fn_name:ident, $metric:literal, $help:literal, $field:ident) => {
        fn $fn_name() -> FamilyGenerator<PodDisruptionBudget> {
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge($metric, $help, Stability::Stable),
                |o: &PodDisruptionBudget| {
                    vec![Sample::new("", o.status.as_ref().map(|s| s.$field).unwrap_or(0) as f64)]
                },
            )
        }
    };
}

status_field_family!(
    current_healthy_family,
    "kube_poddisruptionbudget_status_current_healthy",
    "Current number of healthy pods.",
    current_healthy
);
status_field_family!(
    desired_healthy_family,
    "kube_poddisruptionbudget_status_desired_healthy",
    "Minimum desired number of healthy pods.",
    desired_healthy
);
status_field_family!(
    disruptions_allowed_family,
    "kube_poddisruptionbudget_status_pod_disruptions_allowed",
    "Number of pod disruptions that are currently allowed.",
    disruptions_allowed
);
status_field_family!(
    expected_pods_family,
    "kube_poddisruptionbudget_status_expected_pods",
    "Total number of pods counted by this disruption budget.",
    expected_pods
);

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<PodDisruptionBudget>> {
    vec![
        current_healthy_family(),
        desired_healthy_family(),
        disruptions_allowed_family(),
        expected_pods_family(),
        created_family("kube_poddisruptionbudget_created", |o: &PodDisruptionBudget| &o.metadata),
        labels_family(
            "kube_poddisruptionbudget_labels",
            allow_labels,
            |o: &PodDisruptionBudget| &o.metadata,
        ),
        annotations_family(
            "kube_poddisruptionbudget_annotations",
            allow_annotations,
            |o: &PodDisruptionBudget| &o.metadata,
        ),
        owner_family("kube_poddisruptionbudget_owner", |o: &PodDisruptionBudget| &o.metadata),
    ]
}
