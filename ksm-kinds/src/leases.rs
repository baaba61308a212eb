//! `leases` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::coordination::v1::Lease;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "leases";

pub fn key_fn(obj: &Lease) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Lease) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Lease> {
    namespaced_identity("lease", |o: &Lease| &o.metadata)
}

fn owner_info_family() -> FamilyGenerator<Lease> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_lease_owner",
            "Information about the Lease's owner.",
            Stability::Stable,
        ),
        |o: &Lease| {
            o.spec
                .as_ref()
                .and_then(|s| s.holder_identity.clone())
                .map(|holder| vec![Sample::new("", 1.0).with_label("owner_kind", "Node").with_label("owner_name", holder)])
                .unwrap_or_default()
        },
    )
}

fn renew_time_family() -> FamilyGenerator<Lease> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_lease_renew_time",
            "Renew time for this Lease.",
            Stability::Stable,
        ),
        |o: &Lease| {
            o.spec
                .as_ref()
                .and_then(|s| s.renew_time.as_ref())
                .map(|t| Sample::new("", quantity::unix_seconds(t.0.timestamp())))
                .into_iter()
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Lease>> {
    vec![
        owner_info_family(),
        renew_time_family(),
        created_family("kube_lease_created", |o: &Lease| &o.metadata),
        labels_family("kube_lease_labels", allow_labels, |o: &Lease| &o.metadata),
        annotations_family("kube_lease_annotations", allow_annotations, |o: &Lease| &o.metadata),
        owner_family("kube_lease_owner_reference", |o: &Lease| &o.metadata),
    ]
}
