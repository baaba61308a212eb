//! `serviceaccounts` (baseline depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::api::core::v1::ServiceAccount;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "serviceaccounts";

pub fn key_fn(obj: &ServiceAccount) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ServiceAccount) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ServiceAccount> {
    namespaced_identity("serviceaccount", |o: &ServiceAccount| &o.metadata)
}

fn secrets_count_family() -> FamilyGenerator<ServiceAccount> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_serviceaccount_secrets",
            "Number of secrets attached to this service account.",
            Stability::Stable,
        ),
        |o: &ServiceAccount| vec![Sample::new("", o.secrets.as_ref().map(|s| s.len()).unwrap_or(0) as f64)],
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<ServiceAccount>> {
    vec![
        secrets_count_family(),
        created_family("kube_serviceaccount_created", |o: &ServiceAccount| &o.metadata),
        labels_family("kube_serviceaccount_labels", allow_labels, |o: &ServiceAccount| &o.metadata),
        annotations_family(
            "kube_serviceaccount_annotations",
            allow_annotations,
            |o: &ServiceAccount| &o.metadata,
        ),
    ]
}
