//! `deployments` (full depth).

use crate::common::{annotations_family, condition_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "deployments";

pub fn key_fn(obj: &Deployment) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Deployment) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Deployment> {
    namespaced_identity("deployment", |o: &Deployment| &o.metadata)
}

fn spec_replicas_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_spec_replicas",
            "Number of desired pods for a deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            o.spec
                .as_ref()
                .and_then(|s| s.replicas)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

/// `floor(replicas * pct)` for `maxUnavailable` and `ceil(replicas * pct)`
/// for `maxSurge`, matching the rolling-update rounding rules an
/// orchestrator itself applies.
fn resolve_int_or_percent(v: &IntOrString, replicas: i32, round_up: bool) -> Option<f64> {
    match v {
        IntOrString::Int(n) => Some(*n as f64),
        IntOrString::String(s) => {
            let pct: f64 = s.strip_suffix('%')?.parse().ok()?;
            let raw = replicas as f64 * pct / 100.0;
            Some(if round_up { raw.ceil() } else { raw.floor() })
        }
    }
}

fn rolling_update_fields(o: &Deployment) -> Option<(i32, &IntOrString, &IntOrString)> {
    let spec = o.spec.as_ref()?;
    let replicas = spec.replicas.unwrap_or(0);
    let ru = spec.strategy.as_ref()?.rolling_update.as_ref()?;
    Some((replicas, ru.max_unavailable.as_ref()?, ru.max_surge.as_ref()?))
}

fn rollingupdate_max_unavailable_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_spec_strategy_rollingupdate_max_unavailable",
            "Maximum number of unavailable replicas during a rolling update of a deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            rolling_update_fields(o)
                .and_then(|(replicas, max_unavailable, _)| resolve_int_or_percent(max_unavailable, replicas, false))
                .map(|v| Sample::new("", v))
                .into_iter()
                .collect()
        },
    )
}

fn rollingupdate_max_surge_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_spec_strategy_rollingupdate_max_surge",
            "Maximum number of replicas that can be scheduled above the desired number of replicas during a rolling update of a deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            rolling_update_fields(o)
                .and_then(|(replicas, _, max_surge)| resolve_int_or_percent(max_surge, replicas, true))
                .map(|v| Sample::new("", v))
                .into_iter()
                .collect()
        },
    )
}

fn status_replicas_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_status_replicas",
            "The number of replicas per deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.replicas).unwrap_or(0) as f64,
            )]
        },
    )
}

fn status_replicas_available_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_status_replicas_available",
            "The number of available replicas per deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.available_replicas).unwrap_or(0) as f64,
            )]
        },
    )
}

fn status_replicas_updated_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_status_replicas_updated",
            "The number of updated replicas per deployment.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.updated_replicas).unwrap_or(0) as f64,
            )]
        },
    )
}

fn status_observed_generation_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_status_observed_generation",
            "The generation observed by the deployment controller.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            o.status
                .as_ref()
                .and_then(|s| s.observed_generation)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn metadata_generation_family() -> FamilyGenerator<Deployment> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_deployment_metadata_generation",
            "Sequence number representing a specific generation of the desired state.",
            Stability::Stable,
        ),
        |o: &Deployment| {
            o.metadata
                .generation
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn condition_family_gen() -> FamilyGenerator<Deployment> {
    condition_family(
        "kube_deployment_status_condition",
        "The current status conditions of a deployment.",
        |o: &Deployment| {
            o.status
                .as_ref()
                .and_then(|s| s.conditions.as_ref())
                .map(|conds| conds.iter().map(|c| (c.type_.clone(), c.status.clone())).collect())
                .unwrap_or_default()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Deployment>> {
    vec![
        spec_replicas_family(),
        rollingupdate_max_unavailable_family(),
        rollingupdate_max_surge_family(),
        status_replicas_family(),
        status_replicas_available_family(),
        status_replicas_updated_family(),
        status_observed_generation_family(),
        metadata_generation_family(),
        condition_family_gen(),
        created_family("kube_deployment_created", |o: &Deployment| &o.metadata),
        labels_family("kube_deployment_labels", allow_labels, |o: &Deployment| &o.metadata),
        annotations_family("kube_deployment_annotations", allow_annotations, |o: &Deployment| &o.metadata),
        owner_family("kube_deployment_owner", |o: &Deployment| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    fn scenario_deployment() -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some("deploy1".to_string()),
                namespace: Some("ns1".to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(5),
                strategy: Some(DeploymentStrategy {
                    type_: Some("RollingUpdate".to_string()),
                    rolling_update: Some(RollingUpdateDeployment {
                        max_unavailable: Some(IntOrString::String("20%".to_string())),
                        max_surge: Some(IntOrString::String("20%".to_string())),
                    }),
                }),
                ..Default::default()
            }),
            status: None,
        }
    }

    #[test]
    fn scenario_five_rolling_update_percentages() {
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&scenario_deployment());

        let max_unavailable = families
            .iter()
            .find(|f| f.name == "kube_deployment_spec_strategy_rollingupdate_max_unavailable")
            .unwrap();
        assert_eq!(max_unavailable.samples[0].value, 1.0);

        let max_surge = families
            .iter()
            .find(|f| f.name == "kube_deployment_spec_strategy_rollingupdate_max_surge")
            .unwrap();
        assert_eq!(max_surge.samples[0].value, 1.0);
    }
}
