//! `daemonsets` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::apps::v1::DaemonSet;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "daemonsets";

pub fn key_fn(obj: &DaemonSet) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &DaemonSet) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<DaemonSet> {
    namespaced_identity("daemonset", |o: &DaemonSet| &o.metadata)
}

macro_rules! status_count_family {
    ($fn_name:ident, $metric:literal, $help:literal, $field:ident) => {
        fn $fn_name() -> FamilyGenerator<DaemonSet> {
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge($metric, $help, Stability::Stable),
                |o: &DaemonSet| vec![Sample::new("", o.status.as_ref().map(|s| s.$field).unwrap_or(0) as f64)],
            )
        }
    };
}

status_count_family!(
    status_desired_family,
    "kube_daemonset_status_desired_number_scheduled",
    "The number of nodes that should be running the pod.",
    desired_number_scheduled
);
status_count_family!(
    status_current_family,
    "kube_daemonset_status_current_number_scheduled",
    "The number of nodes running at least one daemon pod and are supposed to.",
    current_number_scheduled
);
status_count_family!(
    status_ready_family,
    "kube_daemonset_status_number_ready",
    "The number of nodes that should be running the daemon pod and have one or more of the daemon pod running and ready.",
    number_ready
);
status_count_family!(
    status_available_family,
    "kube_daemonset_status_number_available",
    "The number of nodes that should be running the daemon pod and have one or more of the daemon pod running and available.",
    number_available
);
status_count_family!(
    status_misscheduled_family,
    "kube_daemonset_status_number_misscheduled",
    "The number of nodes running a daemon pod but are not supposed to.",
    number_misscheduled
);
status_count_family!(
    status_updated_family,
    "kube_daemonset_status_updated_number_scheduled",
    "The total number of nodes that are running updated daemon pod.",
    updated_number_scheduled
);

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<DaemonSet>> {
    vec![
        status_desired_family(),
        status_current_family(),
        status_ready_family(),
        status_available_family(),
        status_misscheduled_family(),
        status_updated_family(),
        created_family("kube_daemonset_created", |o: &DaemonSet| &o.metadata),
        labels_family("kube_daemonset_labels", allow_labels, |o: &DaemonSet| &o.metadata),
        annotations_family("kube_daemonset_annotations", allow_annotations, |o: &DaemonSet| &o.metadata),
        owner_family("kube_daemonset_owner", |o: &DaemonSet| &o.metadata),
    ]
}
