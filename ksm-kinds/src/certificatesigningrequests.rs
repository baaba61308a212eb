//! `certificatesigningrequests` (baseline depth, cluster-scoped).

use crate::common::{annotations_family, condition_family, created_family, labels_family};
use k8s_openapi::api::certificates::v1::CertificateSigningRequest;
use ksm_core::generator::{FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "certificatesigningrequests";

pub fn key_fn(obj: &CertificateSigningRequest) -> ObjectKey {
    ObjectKey::cluster_scoped(obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &CertificateSigningRequest) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<CertificateSigningRequest> {
    Arc::new(|o: &CertificateSigningRequest| {
        vec![("certificatesigningrequest".to_string(), o.metadata.name.clone().unwrap_or_default())]
    })
}

fn info_family() -> FamilyGenerator<CertificateSigningRequest> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_certificatesigningrequest_info",
            "Information about certificate signing request.",
            Stability::Stable,
        ),
        |o: &CertificateSigningRequest| {
            vec![Sample::new("", 1.0)
                .with_label("signer_name", o.spec.signer_name.clone())]
        },
    )
}

fn condition_family_gen() -> FamilyGenerator<CertificateSigningRequest> {
    condition_family(
        "kube_certificatesigningrequest_condition",
        "The number of each preserved condition for a certificate signing request.",
        |o: &CertificateSigningRequest| {
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
) -> Vec<FamilyGenerator<CertificateSigningRequest>> {
    vec![
        info_family(),
        condition_family_gen(),
        created_family("kube_certificatesigningrequest_created", |o: &CertificateSigningRequest| &o.metadata),
        labels_family(
            "kube_certificatesigningrequest_labels",
            allow_labels,
            |o: &CertificateSigningRequest| &o.metadata,
        ),
        annotations_family(
            "kube_certificatesigningrequest_annotations",
            allow_annotations,
            |o: &CertificateSigningRequest| &o.metadata,
        ),
    ]
}
