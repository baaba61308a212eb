//! `jobs` (full depth).
//!
//! The identity label is `job_name`, not `job`, matching the upstream
//! convention of avoiding a collision with a scrape target's own reserved
//! `job` label.

use crate::common::{annotations_family, condition_family, created_family, labels_family, owner_family};
use k8s_openapi::api::batch::v1::Job;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::sync::Arc;

pub const NAME: &str = "jobs";

pub fn key_fn(obj: &Job) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &Job) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<Job> {
    Arc::new(|o: &Job| {
        vec![
            ("namespace".to_string(), o.metadata.namespace.clone().unwrap_or_default()),
            ("job_name".to_string(), o.metadata.name.clone().unwrap_or_default()),
        ]
    })
}

fn info_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_job_info", "Information about job.", Stability::Stable),
        |_o: &Job| vec![Sample::new("", 1.0)],
    )
}

fn spec_parallelism_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_spec_parallelism",
            "The maximum desired number of pods the job should run at any given time.",
            Stability::Stable,
        ),
        |o: &Job| {
            o.spec
                .as_ref()
                .and_then(|s| s.parallelism)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn spec_completions_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_spec_completions",
            "The desired number of successfully finished pods the job should be run with.",
            Stability::Stable,
        ),
        |o: &Job| {
            o.spec
                .as_ref()
                .and_then(|s| s.completions)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn spec_active_deadline_seconds_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_spec_active_deadline_seconds",
            "The duration in seconds relative to the startTime that the job may be active.",
            Stability::Stable,
        ),
        |o: &Job| {
            o.spec
                .as_ref()
                .and_then(|s| s.active_deadline_seconds)
                .map(|v| Sample::new("", v as f64))
                .into_iter()
                .collect()
        },
    )
}

fn status_active_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_status_active",
            "The number of actively running pods.",
            Stability::Stable,
        ),
        |o: &Job| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.active).unwrap_or(0) as f64,
            )]
        },
    )
}

fn status_succeeded_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_status_succeeded",
            "The number of pods which reached phase Succeeded.",
            Stability::Stable,
        ),
        |o: &Job| {
            vec![Sample::new(
                "",
                o.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0) as f64,
            )]
        },
    )
}

/// `kube_job_status_failed`: one `reason`-labeled sample per distinct Failed
/// condition reason, or a single `reason=""` sample if the job has failed
/// pods but no conditions explaining why.
fn status_failed_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_status_failed",
            "The number of pods which reached phase Failed.",
            Stability::Stable,
        ),
        |o: &Job| {
            let failed = o.status.as_ref().and_then(|s| s.failed).unwrap_or(0);
            if failed == 0 {
                return vec![];
            }
            let reasons: Vec<String> = o
                .status
                .as_ref()
                .and_then(|s| s.conditions.as_ref())
                .map(|conds| {
                    conds
                        .iter()
                        .filter(|c| c.type_ == "Failed" && c.status == "True")
                        .map(|c| c.reason.clone().unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default();
            if reasons.is_empty() {
                vec![Sample::new("", failed as f64).with_label("reason", "")]
            } else {
                reasons
                    .into_iter()
                    .map(|r| Sample::new("", failed as f64).with_label("reason", r))
                    .collect()
            }
        },
    )
}

fn status_start_time_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_status_start_time",
            "Start time in unix timestamp for a job.",
            Stability::Stable,
        ),
        |o: &Job| {
            o.status
                .as_ref()
                .and_then(|s| s.start_time.as_ref())
                .map(|t| Sample::new("", quantity::unix_seconds(t.0.timestamp())))
                .into_iter()
                .collect()
        },
    )
}

fn status_completion_time_family() -> FamilyGenerator<Job> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_job_status_completion_time",
            "Completion time in unix timestamp for a job.",
            Stability::Stable,
        ),
        |o: &Job| {
            o.status
                .as_ref()
                .and_then(|s| s.completion_time.as_ref())
                .map(|t| Sample::new("", quantity::unix_seconds(t.0.timestamp())))
                .into_iter()
                .collect()
        },
    )
}

fn complete_condition_family() -> FamilyGenerator<Job> {
    condition_family("kube_job_complete", "The job has completed its execution.", |o: &Job| {
        o.status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| {
                conds
                    .iter()
                    .filter(|c| c.type_ == "Complete")
                    .map(|c| (c.type_.clone(), c.status.clone()))
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn failed_condition_family() -> FamilyGenerator<Job> {
    condition_family("kube_job_failed", "The job has failed its execution.", |o: &Job| {
        o.status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| {
                conds
                    .iter()
                    .filter(|c| c.type_ == "Failed")
                    .map(|c| (c.type_.clone(), c.status.clone()))
                    .collect()
            })
            .unwrap_or_default()
    })
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<Job>> {
    vec![
        info_family(),
        created_family("kube_job_created", |o: &Job| &o.metadata),
        spec_parallelism_family(),
        spec_completions_family(),
        spec_active_deadline_seconds_family(),
        status_active_family(),
        status_succeeded_family(),
        status_failed_family(),
        status_start_time_family(),
        status_completion_time_family(),
        complete_condition_family(),
        failed_condition_family(),
        labels_family("kube_job_labels", allow_labels, |o: &Job| &o.metadata),
        annotations_family("kube_job_annotations", allow_annotations, |o: &Job| &o.metadata),
        owner_family("kube_job_owner", |o: &Job| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::batch::v1::JobStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use ksm_core::Composer;

    fn scenario_job() -> Job {
        Job {
            metadata: ObjectMeta {
                name: Some("FailedJobWithNoConditions".to_string()),
                namespace: Some("ns1".to_string()),
                ..Default::default()
            },
            spec: None,
            status: Some(JobStatus {
                failed: Some(1),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn scenario_three_unknown_failure_reason() {
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&scenario_job());
        let status_failed = families.iter().find(|f| f.name == "kube_job_status_failed").unwrap();
        assert_eq!(status_failed.samples.len(), 1);
        let sample = &status_failed.samples[0];
        assert_eq!(sample.value, 1.0);
        assert_eq!(
            sample.labels(),
            &[
                ("namespace".to_string(), "ns1".to_string()),
                ("job_name".to_string(), "FailedJobWithNoConditions".to_string()),
                ("reason".to_string(), "".to_string()),
            ]
        );
    }
}
