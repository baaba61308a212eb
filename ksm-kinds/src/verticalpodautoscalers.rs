//! `verticalpodautoscalers` (baseline depth).
//!
//! `VerticalPodAutoscaler` is a custom resource (`autoscaling.k8s.io/v1`)
//! shipped by the VPA project, not a built-in `k8s-openapi` type, so its
//! shape is hand-rolled here to the fields this catalog needs.

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerticalPodAutoscalerTargetRef {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerticalPodAutoscalerUpdatePolicy {
    #[serde(rename = "updateMode", default)]
    pub update_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerticalPodAutoscalerSpec {
    #[serde(rename = "targetRef")]
    pub target_ref: VerticalPodAutoscalerTargetRef,
    #[serde(rename = "updatePolicy", default)]
    pub update_policy: Option<VerticalPodAutoscalerUpdatePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerticalPodAutoscaler {
    pub metadata: ObjectMeta,
    pub spec: VerticalPodAutoscalerSpec,
}

// k8s-openapi's generated types carry hand-written `Resource`/`Metadata` impls;
// this CRD ships from the VPA project rather than k8s-openapi, so the same
// pair is written out here instead of relying on a generated one.
impl k8s_openapi::Resource for VerticalPodAutoscaler {
    type Scope = k8s_openapi::NamespaceResourceScope;
    const API_VERSION: &'static str = "autoscaling.k8s.io/v1";
    const GROUP: &'static str = "autoscaling.k8s.io";
    const KIND: &'static str = "VerticalPodAutoscaler";
    const VERSION: &'static str = "v1";
    const URL_PATH_SEGMENT: &'static str = "verticalpodautoscalers";
}

impl k8s_openapi::Metadata for VerticalPodAutoscaler {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

pub const NAME: &str = "verticalpodautoscalers";

pub fn key_fn(obj: &VerticalPodAutoscaler) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &VerticalPodAutoscaler) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<VerticalPodAutoscaler> {
    namespaced_identity("verticalpodautoscaler", |o: &VerticalPodAutoscaler| &o.metadata)
}

fn spec_update_mode_family() -> FamilyGenerator<VerticalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_verticalpodautoscaler_spec_updatepolicy_updatemode",
            "Update mode of the VerticalPodAutoscaler.",
            Stability::Stable,
        ),
        |o: &VerticalPodAutoscaler| {
            o.spec
                .update_policy
                .as_ref()
                .and_then(|p| p.update_mode.clone())
                .map(|mode| Sample::new("", 1.0).with_label("update_mode", mode))
                .into_iter()
                .collect()
        },
    )
}

fn info_family() -> FamilyGenerator<VerticalPodAutoscaler> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_verticalpodautoscaler_info",
            "Information about this VerticalPodAutoscaler's target.",
            Stability::Stable,
        ),
        |o: &VerticalPodAutoscaler| {
            vec![Sample::new("", 1.0)
                .with_label("target_api_version", o.spec.target_ref.api_version.clone())
                .with_label("target_kind", o.spec.target_ref.kind.clone())
                .with_label("target_name", o.spec.target_ref.name.clone())]
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<VerticalPodAutoscaler>> {
    vec![
        info_family(),
        spec_update_mode_family(),
        created_family("kube_verticalpodautoscaler_created", |o: &VerticalPodAutoscaler| &o.metadata),
        labels_family(
            "kube_verticalpodautoscaler_labels",
            allow_labels,
            |o: &VerticalPodAutoscaler| &o.metadata,
        ),
        annotations_family(
            "kube_verticalpodautoscaler_annotations",
            allow_annotations,
            |o: &VerticalPodAutoscaler| &o.metadata,
        ),
    ]
}
