//! `horizontalpodautoscalers` (full depth).

use crate::common::{annotations_family, condition_family, created_family, labels_family, namespaced_identity, owner_family};
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "horizontalpodautoscalers";

pub fn key_fn(obj: &HorizontalPodAutoscaler) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &HorizontalPodAutoscaler) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<HorizontalPodAutoscaler> {
    namespaced_identity("horizontalpodautoscaler", |o: &HorizontalPodAutoscaler| &o.metadata)
}

fn info_family() -> FamilyGenerator<HorizontalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_horizontalpodautoscaler_info",
            "Information about this autoscaler.",
            Stability::Stable,
        ),
        |o: &HorizontalPodAutoscaler| {
            let target = o.spec.as_ref().map(|s| &s.scale_target_ref);
            vec![Sample::new("", 1.0)
                .with_label("scaletargetref_kind", target.map(|t| t.kind.clone()).unwrap_or_default())
                .with_label("scaletargetref_name", target.map(|t| t.name.clone()).unwrap_or_default())]
        },
    )
}

fn spec_max_replicas_family() -> FamilyGenerator<HorizontalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_horizontalpodautoscaler_spec_max_replicas",
            "Upper limit for the number of pods that can be set by the autoscaler.",
            Stability::Stable,
        ),
        |o: &HorizontalPodAutoscaler| {
            o.spec
                .as_ref()
                .map(|s| Sample::new("", s.max_replicas as f64))
                .into_iter()
                .collect()
        },
    )
}

fn spec_min_replicas_family() -> FamilyGenerator<HorizontalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_horizontalpodautoscaler_spec_min_replicas",
            "Lower limit for the number of pods that can be set by the autoscaler.",
            Stability::Stable,
        ),
        |o: &HorizontalPodAutoscaler| {
            o.spec
                .as_ref()
                .and_then(|s| s.min_replicas)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn status_current_replicas_family() -> FamilyGenerator<HorizontalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_horizontalpodautoscaler_status_current_replicas",
            "Current number of replicas of pods managed by this autoscaler.",
            Stability::Stable,
        ),
        |o: &HorizontalPodAutoscaler| {
            o.status
                .as_ref()
                .and_then(|s| s.current_replicas)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn status_desired_replicas_family() -> FamilyGenerator<HorizontalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_horizontalpodautoscaler_status_desired_replicas",
            "Desired number of replicas of pods managed by this autoscaler.",
            Stability::Stable,
        ),
        |o: &HorizontalPodAutoscaler| vec![Sample::new("", o.status.as_ref().map(|s| s.desired_replicas).unwrap_or(0) as f64)],
    )
}

fn condition_family_gen() -> FamilyGenerator<HorizontalPodAutoscaler> {
    condition_family(
        "kube_horizontalpodautoscaler_status_condition",
        "The condition of this autoscaler.",
        |o: &HorizontalPodAutoscaler| {
            o.status
                .as_ref()
                .and_then(|s| s.conditions.as_ref())
                .map(|conds| conds.iter().map(|c| (c.type_.clone(), c.status.clone())).collect())
                .unwrap_or_default()
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<HorizontalPodAutoscaler>> {
    vec![
        info_family(),
        spec_max_replicas_family(),
        spec_min_replicas_family(),
        status_current_replicas_family(),
        status_desired_replicas_family(),
        condition_family_gen(),
        created_family("kube_horizontalpodautoscaler_created", |o: &HorizontalPodAutoscaler| &o.metadata),
        labels_family(
            "kube_horizontalpodautoscaler_labels",
            allow_labels,
            |o: &HorizontalPodAutoscaler| &o.metadata,
        ),
        annotations_family(
            "kube_horizontalpodautoscaler_annotations",
            allow_annotations,
            |o: &HorizontalPodAutoscaler| &o.metadata,
        ),
        owner_family("kube_horizontalpodautoscaler_owner", |o: &HorizontalPodAutoscaler| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::autoscaling::v2::{CrossVersionObjectReference, HorizontalPodAutoscalerSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    #[test]
    fn info_family_carries_scale_target_ref() {
        let obj = HorizontalPodAutoscaler {
            metadata: ObjectMeta {
                name: Some("web".into()),
                namespace: Some("ns1".into()),
                ..Default::default()
            },
            spec: Some(HorizontalPodAutoscalerSpec {
                scale_target_ref: CrossVersionObjectReference {
                    kind: "Deployment".into(),
                    name: "web".into(),
                    api_version: Some("apps/v1".into()),
                },
                min_replicas: Some(2),
                max_replicas: 10,
                metrics: None,
                behavior: None,
            }),
            status: None,
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&obj);
        let info = families.iter().find(|f| f.name == "kube_horizontalpodautoscaler_info").unwrap();
        assert!(info.samples[0]
            .labels()
            .contains(&("scaletargetref_kind".to_string(), "Deployment".to_string())));
    }
}
