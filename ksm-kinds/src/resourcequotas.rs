//! `resourcequotas` (full depth).

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, quantity_to_f64};
use k8s_openapi::api::core::v1::ResourceQuota;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;

pub const NAME: &str = "resourcequotas";

pub fn key_fn(obj: &ResourceQuota) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &ResourceQuota) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<ResourceQuota> {
    namespaced_identity("resourcequota", |o: &ResourceQuota| &o.metadata)
}

/// One `(resource, type)`-labeled sample per hard/used entry.
fn resourcequota_family() -> FamilyGenerator<ResourceQuota> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_resourcequota",
            "Information about resource quota.",
            Stability::Stable,
        ),
        |o: &ResourceQuota| {
            let status = o.status.as_ref();
            let hard = status.and_then(|s| s.hard.as_ref());
            let used = status.and_then(|s| s.used.as_ref());
            let mut samples = Vec::new();
            if let Some(hard) = hard {
                for (resource, qty) in hard {
                    samples.push(
                        Sample::new("", quantity_to_f64(qty))
                            .with_label("resource", resource.clone())
                            .with_label("type", "hard"),
                    );
                }
            }
            if let Some(used) = used {
                for (resource, qty) in used {
                    samples.push(
                        Sample::new("", quantity_to_f64(qty))
                            .with_label("resource", resource.clone())
                            .with_label("type", "used"),
                    );
                }
            }
            samples
        },
    )
}

pub fn generators(
    allow_labels: Vec<String>,
    allow_annotations: Vec<String>,
) -> Vec<FamilyGenerator<ResourceQuota>> {
    vec![
        resourcequota_family(),
        created_family("kube_resourcequota_created", |o: &ResourceQuota| &o.metadata),
        labels_family("kube_resourcequota_labels", allow_labels, |o: &ResourceQuota| &o.metadata),
        annotations_family("kube_resourcequota_annotations", allow_annotations, |o: &ResourceQuota| {
            &o.metadata
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::ResourceQuotaStatus;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;
    use std::collections::BTreeMap;

    fn scenario_quota() -> ResourceQuota {
        let mut hard = BTreeMap::new();
        hard.insert("cpu".to_string(), Quantity("4.3".to_string()));
        hard.insert("memory".to_string(), Quantity("2.1G".to_string()));
        hard.insert("pods".to_string(), Quantity("9".to_string()));
        let mut used = BTreeMap::new();
        used.insert("cpu".to_string(), Quantity("2.1".to_string()));
        used.insert("memory".to_string(), Quantity("500M".to_string()));
        used.insert("pods".to_string(), Quantity("8".to_string()));
        ResourceQuota {
            metadata: ObjectMeta {
                name: Some("quotaTest".to_string()),
                namespace: Some("testNS".to_string()),
                ..Default::default()
            },
            spec: None,
            status: Some(ResourceQuotaStatus {
                hard: Some(hard),
                used: Some(used),
            }),
        }
    }

    #[test]
    fn scenario_two_hard_vs_used() {
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&scenario_quota());
        let quota = &families[0];
        assert_eq!(quota.samples.len(), 6);

        let find = |resource: &str, ty: &str| {
            quota
                .samples
                .iter()
                .find(|s| {
                    s.labels().contains(&("resource".to_string(), resource.to_string()))
                        && s.labels().contains(&("type".to_string(), ty.to_string()))
                })
                .unwrap()
        };
        assert_eq!(find("cpu", "hard").value, 4.3);
        assert_eq!(find("cpu", "used").value, 2.1);
        assert_eq!(find("memory", "hard").value, 2.1e9);
        assert_eq!(find("memory", "used").value, 5e8);
        assert_eq!(find("pods", "hard").value, 9.0);
        assert_eq!(find("pods", "used").value, 8.0);
    }
}
