//! `endpoints` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::core::v1::Endpoints;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "endpoints";

pub fn key_fn(obj: &Endpoints) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Endpoints) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Endpoints> {
    namespaced_identity("endpoint", |o: &Endpoints| &o.metadata)
}

fn address_available_family() -> FamilyGenerator<Endpoints> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpoint_address_available",
            "Number of addresses available in endpoint.",
            Stability::Stable,
        ),
        |o: &Endpoints| {
            let count: usize = o
                .subsets
                .as_ref()
                .map(|subsets| subsets.iter().flat_map(|s| s.addresses.as_deref().unwrap_or(&[])).count())
                .unwrap_or(0);
            vec![Sample::new("", count as f64)]
        },
    )
}

fn address_not_ready_family() -> FamilyGenerator<Endpoints> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpoint_address_not_ready",
            "Number of addresses not ready in endpoint.",
            Stability::Stable,
        ),
        |o: &Endpoints| {
            let count: usize = o
                .subsets
                .as_ref()
                .map(|subsets| {
                    subsets
                        .iter()
                        .flat_map(|s| s.not_ready_addresses.as_deref().unwrap_or(&[]))
                        .count()
                })
                .unwrap_or(0);
            vec![Sample::new("", count as f64)]
        },
    )
}

fn ports_family() -> FamilyGenerator<Endpoints> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpoint_ports",
            "Information about the Endpoint ports.",
            Stability::Stable,
        ),
        |o: &Endpoints| {
            o.subsets
                .as_ref()
                .map(|subsets| {
                    subsets
                        .iter()
                        .flat_map(|s| s.ports.as_deref().unwrap_or(&[]))
                        .map(|p| {
                            Sample::new("", 1.0)
                                .with_label("port_name", p.name.clone().unwrap_or_default())
                                .with_label("port_protocol", p.protocol.clone().unwrap_or_default())
                                .with_label("port_number", p.port.to_string())
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Endpoints>> {
    vec![
        address_available_family(),
        address_not_ready_family(),
        ports_family(),
        created_family("kube_endpoint_created", |o: &Endpoints| &o.metadata),
        labels_family("kube_endpoint_labels", allow_labels, |o: &Endpoints| &o.metadata),
        annotations_family("kube_endpoint_annotations", allow_annotations, |o: &Endpoints| &o.metadata),
        owner_family("kube_endpoint_owner", |o: &Endpoints| &o.metadata),
    ]
}
