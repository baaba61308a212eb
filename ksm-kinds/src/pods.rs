//! `pods` (full depth).

use crate::common::{annotations_family, condition_family, created_family, labels_family, namespaced_identity_with_uid, owner_family, quantity_to_f64};
use k8s_openapi::api::core::v1::Pod;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "pods";

pub fn key_fn(obj: &Pod) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Pod) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Pod> {
    namespaced_identity_with_uid("pod", |o: &Pod| &o.metadata)
}

fn info_family() -> FamilyGenerator<Pod> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_pod_info", "Information about pod.", Stability::Stable),
        |o: &Pod| {
            let spec = o.spec.as_ref();
            let status = o.status.as_ref();
            vec![Sample::new("", 1.0)
                .with_label("host_ip", status.and_then(|s| s.host_ip.clone()).unwrap_or_default())
                .with_label("pod_ip", status.and_then(|s| s.pod_ip.clone()).unwrap_or_default())
                .with_label("node", spec.and_then(|s| s.node_name.clone()).unwrap_or_default())
                .with_label("created_by_kind", String::new())
                .with_label("priority_class", spec.and_then(|s| s.priority_class_name.clone()).unwrap_or_default())]
        },
    )
}

fn status_phase_family() -> FamilyGenerator<Pod> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_pod_status_phase",
            "The pods current phase.",
            Stability::Stable,
        ),
        |o: &Pod| {
            let phase = o.status.as_ref().and_then(|s| s.phase.clone()).unwrap_or_default();
            ["Pending", "Running", "Succeeded", "Failed", "Unknown"]
                .iter()
                .map(|p| Sample::new("", if *p == phase { 1.0 } else { 0.0 }).with_label("phase", *p))
                .collect()
        },
    )
}

fn status_ready_family() -> FamilyGenerator<Pod> {
    condition_family("kube_pod_status_ready", "Describes whether the pod is ready to serve requests.", |o: &Pod| {
        o.status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| {
                conds
                    .iter()
                    .filter(|c| c.type_ == "Ready")
                    .map(|c| (c.type_.clone(), c.status.clone()))
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn container_resource_requests_family() -> FamilyGenerator<Pod> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_pod_container_resource_requests",
            "The number of requested resource by a container.",
            Stability::Stable,
        ),
        |o: &Pod| {
            let Some(spec) = o.spec.as_ref() else { return vec![] };
            spec.containers
                .iter()
                .flat_map(|c| {
                    let name = c.name.clone();
                    c.resources
                        .as_ref()
                        .and_then(|r| r.requests.as_ref())
                        .into_iter()
                        .flat_map(move |requests| {
                            let name = name.clone();
                            requests.iter().map(move |(resource, qty)| {
                                Sample::new("", quantity_to_f64(qty))
                                    .with_label("container", name.clone())
                                    .with_label("resource", resource.clone())
                            })
                        })
                })
                .collect()
        },
    )
}

fn container_status_restarts_family() -> FamilyGenerator<Pod> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::counter(
            "kube_pod_container_status_restarts_total",
            "The number of container restarts per container.",
            Stability::Stable,
        ),
        |o: &Pod| {
            o.status
                .as_ref()
                .and_then(|s| s.container_statuses.as_ref())
                .map(|statuses| {
                    statuses
                        .iter()
                        .map(|cs| {
                            Sample::new("", cs.restart_count as f64).with_label("container", cs.name.clone())
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Pod>> {
    vec![
        info_family(),
        status_phase_family(),
        status_ready_family(),
        container_resource_requests_family(),
        container_status_restarts_family(),
        created_family("kube_pod_created", |o: &Pod| &o.metadata),
        labels_family("kube_pod_labels", allow_labels, |o: &Pod| &o.metadata),
        annotations_family("kube_pod_annotations", allow_annotations, |o: &Pod| &o.metadata),
        owner_family("kube_pod_owner", |o: &Pod| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{PodSpec, PodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    #[test]
    fn phase_family_marks_exactly_one_phase() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("p1".to_string()),
                namespace: Some("ns1".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec::default()),
            status: Some(PodStatus {
                phase: Some("Running".to_string()),
                ..Default::default()
            }),
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&pod);
        let phase = families.iter().find(|f| f.name == "kube_pod_status_phase").unwrap();
        let on: Vec<_> = phase.samples.iter().filter(|s| s.value == 1.0).collect();
        assert_eq!(on.len(), 1);
        assert!(on[0].labels().contains(&("phase".to_string(), "Running".to_string())));
    }
}
