//! The closed kind registry and per-kind family generator catalogs. This
//! crate knows about `k8s-openapi` object types but nothing about
//! how they are fetched — that is `ksm`'s job.

pub mod common;

pub mod certificatesigningrequests;
pub mod clusterrolebindings;
pub mod clusterroles;
pub mod configmaps;
pub mod cronjobs;
pub mod daemonsets;
pub mod deployments;
pub mod endpoints;
pub mod endpointslices;
pub mod horizontalpodautoscalers;
pub mod ingressclasses;
pub mod ingresses;
pub mod jobs;
pub mod leases;
pub mod limitranges;
pub mod mutatingwebhookconfigurations;
pub mod namespaces;
pub mod networkpolicies;
pub mod nodes;
pub mod persistentvolumeclaims;
pub mod persistentvolumes;
pub mod poddisruptionbudgets;
pub mod pods;
pub mod replicasets;
pub mod replicationcontrollers;
pub mod resourcequotas;
pub mod rolebindings;
pub mod roles;
pub mod secrets;
pub mod serviceaccounts;
pub mod services;
pub mod statefulsets;
pub mod storageclasses;
pub mod validatingwebhookconfigurations;
pub mod verticalpodautoscalers;
pub mod volumeattachments;

use std::fmt;
use std::str::FromStr;

/// The closed set of built-in kind names. Custom-resource factories extend
/// the builder's registry at runtime with names outside this
/// enum; this type only covers what ships in the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum KindName {
    CertificateSigningRequests,
    ClusterRoleBindings,
    ClusterRoles,
    ConfigMaps,
    CronJobs,
    DaemonSets,
    Deployments,
    Endpoints,
    EndpointSlices,
    HorizontalPodAutoscalers,
    IngressClasses,
    Ingresses,
    Jobs,
    Leases,
    LimitRanges,
    MutatingWebhookConfigurations,
    Namespaces,
    NetworkPolicies,
    Nodes,
    PersistentVolumeClaims,
    PersistentVolumes,
    PodDisruptionBudgets,
    Pods,
    ReplicaSets,
    ReplicationControllers,
    ResourceQuotas,
    RoleBindings,
    Roles,
    Secrets,
    ServiceAccounts,
    Services,
    StatefulSets,
    StorageClasses,
    ValidatingWebhookConfigurations,
    VerticalPodAutoscalers,
    VolumeAttachments,
}

impl KindName {
    /// The wire/config name.
    pub fn as_str(self) -> &'static str {
        match self {
            KindName::CertificateSigningRequests => "certificatesigningrequests",
            KindName::ClusterRoleBindings => "clusterrolebindings",
            KindName::ClusterRoles => "clusterroles",
            KindName::ConfigMaps => "configmaps",
            KindName::CronJobs => "cronjobs",
            KindName::DaemonSets => "daemonsets",
            KindName::Deployments => "deployments",
            KindName::Endpoints => "endpoints",
            KindName::EndpointSlices => "endpointslices",
            KindName::HorizontalPodAutoscalers => "horizontalpodautoscalers",
            KindName::IngressClasses => "ingressclasses",
            KindName::Ingresses => "ingresses",
            KindName::Jobs => "jobs",
            KindName::Leases => "leases",
            KindName::LimitRanges => "limitranges",
            KindName::MutatingWebhookConfigurations => "mutatingwebhookconfigurations",
            KindName::Namespaces => "namespaces",
            KindName::NetworkPolicies => "networkpolicies",
            KindName::Nodes => "nodes",
            KindName::PersistentVolumeClaims => "persistentvolumeclaims",
            KindName::PersistentVolumes => "persistentvolumes",
            KindName::PodDisruptionBudgets => "poddisruptionbudgets",
            KindName::Pods => "pods",
            KindName::ReplicaSets => "replicasets",
            KindName::ReplicationControllers => "replicationcontrollers",
            KindName::ResourceQuotas => "resourcequotas",
            KindName::RoleBindings => "rolebindings",
            KindName::Roles => "roles",
            KindName::Secrets => "secrets",
            KindName::ServiceAccounts => "serviceaccounts",
            KindName::Services => "services",
            KindName::StatefulSets => "statefulsets",
            KindName::StorageClasses => "storageclasses",
            KindName::ValidatingWebhookConfigurations => "validatingwebhookconfigurations",
            KindName::VerticalPodAutoscalers => "verticalpodautoscalers",
            KindName::VolumeAttachments => "volumeattachments",
        }
    }

    /// Every built-in kind.
    pub const ALL: &'static [KindName] = &[
        KindName::CertificateSigningRequests,
        KindName::ClusterRoleBindings,
        KindName::ClusterRoles,
        KindName::ConfigMaps,
        KindName::CronJobs,
        KindName::DaemonSets,
        KindName::Deployments,
        KindName::Endpoints,
        KindName::EndpointSlices,
        KindName::HorizontalPodAutoscalers,
        KindName::IngressClasses,
        KindName::Ingresses,
        KindName::Jobs,
        KindName::Leases,
        KindName::LimitRanges,
        KindName::MutatingWebhookConfigurations,
        KindName::Namespaces,
        KindName::NetworkPolicies,
        KindName::Nodes,
        KindName::PersistentVolumeClaims,
        KindName::PersistentVolumes,
        KindName::PodDisruptionBudgets,
        KindName::Pods,
        KindName::ReplicaSets,
        KindName::ReplicationControllers,
        KindName::ResourceQuotas,
        KindName::RoleBindings,
        KindName::Roles,
        KindName::Secrets,
        KindName::ServiceAccounts,
        KindName::Services,
        KindName::StatefulSets,
        KindName::StorageClasses,
        KindName::ValidatingWebhookConfigurations,
        KindName::VerticalPodAutoscalers,
        KindName::VolumeAttachments,
    ];

    /// Whether this kind is namespace-scoped (affects
    /// per-namespace store fan-out).
    pub fn namespaced(self) -> bool {
        !matches!(
            self,
            KindName::ClusterRoleBindings
                | KindName::ClusterRoles
                | KindName::IngressClasses
                | KindName::MutatingWebhookConfigurations
                | KindName::Namespaces
                | KindName::Nodes
                | KindName::PersistentVolumes
                | KindName::StorageClasses
                | KindName::ValidatingWebhookConfigurations
                | KindName::VolumeAttachments
                | KindName::CertificateSigningRequests
        )
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for an unknown kind name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown kind name {0:?}")]
pub struct UnknownKindName(pub String);

impl FromStr for KindName {
    type Err = UnknownKindName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KindName::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKindName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_built_in_kind_round_trips_through_its_name() {
        for kind in KindName::ALL {
            assert_eq!(KindName::from_str(kind.as_str()).unwrap(), *kind);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(KindName::from_str("widgets").is_err());
    }

    #[test]
    fn registry_has_every_built_in_kind() {
        assert_eq!(KindName::ALL.len(), 36);
    }
}
