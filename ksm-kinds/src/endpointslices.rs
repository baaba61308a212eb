//! `endpointslices` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::discovery::v1::EndpointSlice;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "endpointslices";

pub fn key_fn(obj: &EndpointSlice) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &EndpointSlice) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<EndpointSlice> {
    namespaced_identity("endpointslice", |o: &EndpointSlice| &o.metadata)
}

fn info_family() -> FamilyGenerator<EndpointSlice> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpointslice_info",
            "Information about endpointslice.",
            Stability::Stable,
        ),
        |o: &EndpointSlice| vec![Sample::new("", 1.0).with_label("address_type", o.address_type.clone())],
    )
}

fn ports_family() -> FamilyGenerator<EndpointSlice> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpointslice_ports",
            "Information about endpointslice ports.",
            Stability::Stable,
        ),
        |o: &EndpointSlice| {
            o.ports
                .as_ref()
                .map(|ports| {
                    ports
                        .iter()
                        .map(|p| {
                            Sample::new("", 1.0)
                                .with_label("port_name", p.name.clone().unwrap_or_default())
                                .with_label("port_protocol", p.protocol.clone().unwrap_or_default())
                                .with_label("port_number", p.port.map(|n| n.to_string()).unwrap_or_default())
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    )
}

fn endpoints_family() -> FamilyGenerator<EndpointSlice> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_endpointslice_endpoints",
            "Information about the endpointslice endpoints.",
            Stability::Stable,
        ),
        |o: &EndpointSlice| {
            o.endpoints
                .iter()
                .flat_map(|ep| {
                    let conditions = ep.conditions.as_ref();
                    let ready = conditions.and_then(|c| c.ready).unwrap_or(false);
                    let serving = conditions.and_then(|c| c.serving).unwrap_or(ready);
                    let terminating = conditions.and_then(|c| c.terminating).unwrap_or(false);
                    ep.addresses.iter().map(move |addr| {
                        Sample::new("", 1.0)
                            .with_label("address", addr.clone())
                            .with_label("hostname", ep.hostname.clone().unwrap_or_default())
                            .with_label("node_name", ep.node_name.clone().unwrap_or_default())
                            .with_label("ready", ready.to_string())
                            .with_label("serving", serving.to_string())
                            .with_label("terminating", terminating.to_string())
                    })
                })
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<EndpointSlice>> {
    vec![
        info_family(),
        ports_family(),
        endpoints_family(),
        created_family("kube_endpointslice_created", |o: &EndpointSlice| &o.metadata),
        labels_family("kube_endpointslice_labels", allow_labels, |o: &EndpointSlice| &o.metadata),
        annotations_family("kube_endpointslice_annotations", allow_annotations, |o: &EndpointSlice| &o.metadata),
        owner_family("kube_endpointslice_owner", |o: &EndpointSlice| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::discovery::v1::{Endpoint, EndpointConditions};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    #[test]
    fn endpoints_family_derives_serving_from_ready_when_absent() {
        let obj = EndpointSlice {
            metadata: ObjectMeta {
                name: Some("web-abc12".into()),
                namespace: Some("ns1".into()),
                ..Default::default()
            },
            address_type: "IPv4".into(),
            endpoints: vec![Endpoint {
                addresses: vec!["10.0.0.1".into()],
                conditions: Some(EndpointConditions {
                    ready: Some(true),
                    serving: None,
                    terminating: None,
                }),
                hostname: None,
                node_name: Some("node-1".into()),
                target_ref: None,
                hints: None,
                zone: None,
            }],
            ports: None,
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&obj);
        let endpoints = families.iter().find(|f| f.name == "kube_endpointslice_endpoints").unwrap();
        let sample = &endpoints.samples[0];
        assert!(sample.labels().contains(&("ready".to_string(), "true".to_string())));
        assert!(sample.labels().contains(&("serving".to_string(), "true".to_string())));
    }
}
