//! `networkpolicies` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "networkpolicies";

pub fn key_fn(obj: &NetworkPolicy) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &NetworkPolicy) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<NetworkPolicy> {
    namespaced_identity("networkpolicy", |o: &NetworkPolicy| &o.metadata)
}

fn spec_ingress_rules_family() -> FamilyGenerator<NetworkPolicy> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_networkpolicy_spec_ingress_rules",
            "Number of ingress rules on this policy.",
            Stability::Stable,
        ),
        |o: &NetworkPolicy| {
            let count = o.spec.as_ref().and_then(|s| s.ingress.as_ref()).map(|v| v.len()).unwrap_or(0);
            vec![Sample::new("", count as f64)]
        },
    )
}

fn spec_egress_rules_family() -> FamilyGenerator<NetworkPolicy> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_networkpolicy_spec_egress_rules",
            "Number of egress rules on this policy.",
            Stability::Stable,
        ),
        |o: &NetworkPolicy| {
            let count = o.spec.as_ref().and_then(|s| s.egress.as_ref()).map(|v| v.len()).unwrap_or(0);
            vec![Sample::new("", count as f64)]
        },
    )
}

fn spec_policy_types_family() -> FamilyGenerator<NetworkPolicy> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_networkpolicy_spec_policy_types",
            "The policy types of this policy (Ingress, Egress, or both).",
            Stability::Stable,
        ),
        |o: &NetworkPolicy| {
            o.spec
                .as_ref()
                .and_then(|s| s.policy_types.as_ref())
                .map(|types| types.iter().map(|t| Sample::new("", 1.0).with_label("policy_type", t.clone())).collect())
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<NetworkPolicy>> {
    vec![
        spec_ingress_rules_family(),
        spec_egress_rules_family(),
        spec_policy_types_family(),
        created_family("kube_networkpolicy_created", |o: &NetworkPolicy| &o.metadata),
        labels_family("kube_networkpolicy_labels", allow_labels, |o: &NetworkPolicy| &o.metadata),
        annotations_family(
            "kube_networkpolicy_annotations",
            allow_annotations,
            |o: &NetworkPolicy| &o.metadata,
        ),
        owner_family("kube_networkpolicy_owner", |o: &NetworkPolicy| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::networking::v1::{NetworkPolicyIngressRule, NetworkPolicySpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
    use ksm_core::Composer;

    #[test]
    fn spec_ingress_rules_family_counts_rules() {
        let obj = NetworkPolicy {
            metadata: ObjectMeta {
                name: Some("deny-all-except-web".into()),
                namespace: Some("ns1".into()),
                ..Default::default()
            },
            spec: Some(NetworkPolicySpec {
                pod_selector: LabelSelector::default(),
                policy_types: Some(vec!["Ingress".into()]),
                ingress: Some(vec![NetworkPolicyIngressRule::default(), NetworkPolicyIngressRule::default()]),
                egress: None,
            }),
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&obj);
        let ingress = families.iter().find(|f| f.name == "kube_networkpolicy_spec_ingress_rules").unwrap();
        assert_eq!(ingress.samples[0].value, 2.0);
    }
}
