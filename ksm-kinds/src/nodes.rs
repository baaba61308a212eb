//! `nodes` (full depth, cluster-scoped).

use crate::common::{annotations_family, cluster_scoped_identity_with_uid, condition_family, created_family, labels_family, quantity_to_f64};
use k8s_openapi::api::core::v1::Node;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "nodes";

pub fn key_fn(obj: &Node) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Node) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Node> {
    cluster_scoped_identity_with_uid("node", |o: &Node| &o.metadata)
}

fn info_family() -> FamilyGenerator<Node> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_node_info", "Information about a cluster node.", Stability::Stable),
        |o: &Node| {
            let info = o.status.as_ref().and_then(|s| s.node_info.as_ref());
            vec![Sample::new("", 1.0)
                .with_label(
                    "kernel_version",
                    info.map(|i| i.kernel_version.clone()).unwrap_or_default(),
                )
                .with_label(
                    "os_image",
                    info.map(|i| i.os_image.clone()).unwrap_or_default(),
                )
                .with_label(
                    "kubelet_version",
                    info.map(|i| i.kubelet_version.clone()).unwrap_or_default(),
                )
                .with_label(
                    "container_runtime_version",
                    info.map(|i| i.container_runtime_version.clone()).unwrap_or_default(),
                )]
        },
    )
}

fn condition_family_gen() -> FamilyGenerator<Node> {
    condition_family("kube_node_status_condition", "The condition of a cluster node.", |o: &Node| {
        o.status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| conds.iter().map(|c| (c.type_.clone(), c.status.clone())).collect())
            .unwrap_or_default()
    })
}

fn unschedulable_family() -> FamilyGenerator<Node> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_node_spec_unschedulable",
            "Whether a node can schedule new pods.",
            Stability::Stable,
        ),
        |o: &Node| {
            vec![Sample::new(
                "",
                quantity::bool_to_f64(o.spec.as_ref().and_then(|s| s.unschedulable).unwrap_or(false)),
            )]
        },
    )
}

fn status_capacity_family() -> FamilyGenerator<Node> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_node_status_capacity",
            "The capacity for different resources of a node.",
            Stability::Stable,
        ),
        |o: &Node| {
            o.status
                .as_ref()
                .and_then(|s| s.capacity.as_ref())
                .map(|cap| {
                    cap.iter()
                        .map(|(resource, qty)| {
                            Sample::new("", quantity_to_f64(qty)).with_label("resource", resource.clone())
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    )
}

fn status_allocatable_family() -> FamilyGenerator<Node> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_node_status_allocatable",
            "The allocatable for different resources of a node that are available for scheduling.",
            Stability::Stable,
        ),
        |o: &Node| {
            o.status
                .as_ref()
                .and_then(|s| s.allocatable.as_ref())
                .map(|cap| {
                    cap.iter()
                        .map(|(resource, qty)| {
                            Sample::new("", quantity_to_f64(qty)).with_label("resource", resource.clone())
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Node>> {
    vec![
        info_family(),
        condition_family_gen(),
        unschedulable_family(),
        status_capacity_family(),
        status_allocatable_family(),
        created_family("kube_node_created", |o: &Node| &o.metadata),
        labels_family("kube_node_labels", allow_labels, |o: &Node| &o.metadata),
        annotations_family("kube_node_annotations", allow_annotations, |o: &Node| &o.metadata),
    ]
}
