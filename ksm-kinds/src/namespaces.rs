//! `namespaces` (full depth, cluster-scoped).

use crate::common::{annotations_family, cluster_scoped_identity_with_uid, created_family, labels_family};
use k8s_openapi::api::core::v1::Namespace;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "namespaces";

pub fn key_fn(obj: &Namespace) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Namespace) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Namespace> {
    cluster_scoped_identity_with_uid("namespace", |o: &Namespace| &o.metadata)
}

fn status_phase_family() -> FamilyGenerator<Namespace> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_namespace_status_phase",
            "Kubernetes namespace status phase.",
            Stability::Stable,
        ),
        |o: &Namespace| {
            const PHASES: [&str; 2] = ["Active", "Terminating"];
            let current = o.status.as_ref().and_then(|s| s.phase.clone()).unwrap_or_default();
            PHASES
                .iter()
                .map(|phase| {
                    Sample::new("", if *phase == current { 1.0 } else { 0.0 }).with_label("phase", *phase)
                })
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Namespace>> {
    vec![
        status_phase_family(),
        created_family("kube_namespace_created", |o: &Namespace| &o.metadata),
        labels_family("kube_namespace_labels", allow_labels, |o: &Namespace| &o.metadata),
        annotations_family("kube_namespace_annotations", allow_annotations, |o: &Namespace| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::NamespaceStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    #[test]
    fn status_phase_family_marks_exactly_one_phase() {
        let obj = Namespace {
            metadata: ObjectMeta {
                name: Some("prod".into()),
                ..Default::default()
            },
            spec: None,
            status: Some(NamespaceStatus {
                phase: Some("Terminating".into()),
                ..Default::default()
            }),
        };
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&obj);
        let phase = families.iter().find(|f| f.name == "kube_namespace_status_phase").unwrap();
        assert_eq!(phase.samples.iter().filter(|s| s.value == 1.0).count(), 1);
        assert!(phase.samples.iter().any(|s| s.value == 1.0 && s.labels().contains(&("phase".to_string(), "Terminating".to_string()))));
    }
}
