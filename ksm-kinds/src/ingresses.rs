//! `ingresses` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::networking::v1::Ingress;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "ingresses";

pub fn key_fn(obj: &Ingress) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Ingress) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Ingress> {
    namespaced_identity("ingress", |o: &Ingress| &o.metadata)
}

fn info_family() -> FamilyGenerator<Ingress> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_ingress_info",
            "Information about ingress.",
            Stability::Stable,
        ),
        |o: &Ingress| {
            let class = o
                .spec
                .as_ref()
                .and_then(|s| s.ingress_class_name.clone())
                .unwrap_or_else(|| "_default".to_string());
            vec![Sample::new("", 1.0).with_label("ingressclass", class)]
        },
    )
}

fn path_family() -> FamilyGenerator<Ingress> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_ingress_path",
            "Ingress host, paths and backend service information.",
            Stability::Stable,
        ),
        |o: &Ingress| {
            let Some(spec) = o.spec.as_ref() else {
                return vec![];
            };
            let Some(rules) = spec.rules.as_ref() else {
                return vec![];
            };
            rules
                .iter()
                .flat_map(|rule| {
                    let host = rule.host.clone().unwrap_or_default();
                    let http = rule.http.as_ref();
                    http.into_iter().flat_map(move |http| {
                        let host = host.clone();
                        http.paths.iter().map(move |path| {
                            let service = path.backend.service.as_ref();
                            let service_name = service.map(|s| s.name.clone()).unwrap_or_default();
                            let service_port = service
                                .and_then(|s| s.port.as_ref())
                                .map(|p| {
                                    p.number
                                        .map(|n| n.to_string())
                                        .or_else(|| p.name.clone())
                                        .unwrap_or_default()
                                })
                                .unwrap_or_default();
                            Sample::new("", 1.0)
                                .with_label("host", host.clone())
                                .with_label("path", path.path.clone().unwrap_or_default())
                                .with_label("path_type", path.path_type.clone())
                                .with_label("service_name", service_name)
                                .with_label("service_port", service_port)
                        })
                    })
                })
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Ingress>> {
    vec![
        info_family(),
        path_family(),
        created_family("kube_ingress_created", |o: &Ingress| &o.metadata),
        labels_family("kube_ingress_labels", allow_labels, |o: &Ingress| &o.metadata),
        annotations_family("kube_ingress_annotations", allow_annotations, |o: &Ingress| &o.metadata),
        owner_family("kube_ingress_owner", |o: &Ingress| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, IngressBackend, IngressRule, IngressServiceBackend, IngressSpec,
        ServiceBackendPort,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
    use k8s_openapi::chrono::{TimeZone, Utc};
    use ksm_core::Composer;

    fn scenario_ingress() -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                name: Some("ingress4".to_string()),
                namespace: Some("ns4".to_string()),
                creation_timestamp: Some(Time(Utc.timestamp_opt(1_501_569_018, 0).unwrap())),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                rules: Some(vec![
                    IngressRule {
                        host: Some("somehost".to_string()),
                        http: Some(HTTPIngressRuleValue {
                            paths: vec![HTTPIngressPath {
                                path: Some("/somepath".to_string()),
                                path_type: "Exact".to_string(),
                                backend: IngressBackend {
                                    service: Some(IngressServiceBackend {
                                        name: "someservice".to_string(),
                                        port: Some(ServiceBackendPort {
                                            number: Some(1234),
                                            name: None,
                                        }),
                                    }),
                                    resource: None,
                                },
                            }],
                        }),
                    },
                    IngressRule {
                        host: Some("somehost2".to_string()),
                        http: None,
                    },
                ]),
                ..Default::default()
            }),
            status: None,
        }
    }

    #[test]
    fn scenario_one_ingress_with_two_rules() {
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&scenario_ingress());

        let path = &families[1];
        assert_eq!(path.name, "kube_ingress_path");
        assert_eq!(path.samples.len(), 1, "the ruleless second host emits no path sample");
        assert_eq!(
            path.samples[0].labels(),
            &[
                ("namespace".to_string(), "ns4".to_string()),
                ("ingress".to_string(), "ingress4".to_string()),
                ("host".to_string(), "somehost".to_string()),
                ("path".to_string(), "/somepath".to_string()),
                ("path_type".to_string(), "Exact".to_string()),
                ("service_name".to_string(), "someservice".to_string()),
                ("service_port".to_string(), "1234".to_string()),
            ]
        );

        let info = &families[0];
        assert_eq!(info.samples[0].labels()[2], ("ingressclass".to_string(), "_default".to_string()));

        let created = &families[2];
        assert_eq!(created.samples[0].value, 1_501_569_018.0);
    }
}
