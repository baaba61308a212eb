//! `services` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::core::v1::Service;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "services";

pub fn key_fn(obj: &Service) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Service) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Service> {
    namespaced_identity("service", |o: &Service| &o.metadata)
}

fn info_family() -> FamilyGenerator<Service> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_service_info", "Information about service.", Stability::Stable),
        |o: &Service| {
            let spec = o.spec.as_ref();
            vec![Sample::new("", 1.0)
                .with_label("cluster_ip", spec.and_then(|s| s.cluster_ip.clone()).unwrap_or_default())
                .with_label("external_name", spec.and_then(|s| s.external_name.clone()).unwrap_or_default())
                .with_label("type", spec.and_then(|s| s.type_.clone()).unwrap_or_default())]
        },
    )
}

fn spec_type_family() -> FamilyGenerator<Service> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_service_spec_type",
            "Type about service.",
            Stability::Stable,
        ),
        |o: &Service| {
            o.spec
                .as_ref()
                .and_then(|s| s.type_.clone())
                .map(|t| Sample::new("", 1.0).with_label("type", t))
                .into_iter()
                .collect()
        },
    )
}

fn spec_ports_family() -> FamilyGenerator<Service> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_service_spec_external_ip",
            "Service externalIPs.",
            Stability::Stable,
        ),
        |o: &Service| {
            o.spec
                .as_ref()
                .and_then(|s| s.external_i_ps.as_ref())
                .map(|ips| ips.iter().map(|ip| Sample::new("", 1.0).with_label("external_ip", ip.clone())).collect())
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Service>> {
    vec![
        info_family(),
        spec_type_family(),
        spec_ports_family(),
        created_family("kube_service_created", |o: &Service| &o.metadata),
        labels_family("kube_service_labels", allow_labels, |o: &Service| &o.metadata),
        annotations_family("kube_service_annotations", allow_annotations, |o: &Service| &o.metadata),
        owner_family("kube_service_owner", |o: &Service| &o.metadata),
    ]
}
