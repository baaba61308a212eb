//! `cronjobs` (full depth).
//!
//! Next-scheduled-time evaluation is the one generator in this crate that
//! can fail on malformed input: an unparseable schedule or unknown time zone
//! omits the sample rather than aborting the store write.

use crate::common::{annotations_family, created_family, labels_family, namespaced_identity, owner_family};
use chrono_tz::Tz;
use cron::Schedule;
use k8s_openapi::api::batch::v1::CronJob;
use ksm_core::generator::{quantity, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
use ksm_core::key::ObjectKey;
use ksm_core::sample::Sample;
use ksm_core::Stability;
use std::str::FromStr;

pub const NAME: &str = "cronjobs";

pub fn key_fn(obj: &CronJob) -> ObjectKey {
    ObjectKey::new(obj.metadata.namespace.clone(), obj.metadata.name.clone().unwrap_or_default())
}

pub fn uid(obj: &CronJob) -> String {
    crate::common::uid_of(&obj.metadata)
}

pub fn identity() -> IdentityLabelFn<CronJob> {
    namespaced_identity("cronjob", |o: &CronJob| &o.metadata)
}

fn info_family() -> FamilyGenerator<CronJob> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge("kube_cronjob_info", "Info about cronjob.", Stability::Stable),
        |o: &CronJob| {
            let spec = o.spec.as_ref();
            let schedule = spec.map(|s| s.schedule.clone()).unwrap_or_default();
            let timezone = spec.and_then(|s| s.time_zone.clone()).unwrap_or_default();
            vec![Sample::new("", 1.0)
                .with_label("schedule", schedule)
                .with_label("timezone", timezone)]
        },
    )
}

fn suspend_family() -> FamilyGenerator<CronJob> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_cronjob_spec_suspend",
            "Suspend flag tells the controller to suspend subsequent executions.",
            Stability::Stable,
        ),
        |o: &CronJob| {
            vec![Sample::new(
                "",
                quantity::bool_to_f64(o.spec.as_ref().and_then(|s| s.suspend).unwrap_or(false)),
            )]
        },
    )
}

/// Pads a standard 5-field cron expression (minute hour dom month dow, the
/// Kubernetes `CronJobSpec.schedule` format) with a leading `0` seconds
/// field for the `cron` crate's 6-field grammar.
fn pad_seconds_field(expr: &str) -> String {
    format!("0 {expr}")
}

fn next_schedule_time(o: &CronJob) -> Option<f64> {
    let spec = o.spec.as_ref()?;
    if spec.suspend.unwrap_or(false) {
        return None;
    }
    let tz: Tz = match spec.time_zone.as_deref() {
        Some(name) => match name.parse() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(timezone = name, "unknown time zone, omitting next-schedule-time");
                return None;
            }
        },
        None => Tz::UTC,
    };
    let schedule = match Schedule::from_str(&pad_seconds_field(&spec.schedule)) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(schedule = %spec.schedule, %err, "invalid cron schedule, omitting next-schedule-time");
            return None;
        }
    };
    let last_schedule = o
        .status
        .as_ref()
        .and_then(|s| s.last_schedule_time.as_ref())
        .map(|t| t.0.timestamp());
    let created = crate::common::creation_timestamp(&o.metadata);
    let base_epoch = last_schedule.into_iter().chain(created).max()?;
    let base = chrono::DateTime::from_timestamp(base_epoch, 0)?.with_timezone(&tz);
    schedule.after(&base).next().map(|t| quantity::unix_seconds(t.timestamp()))
}

fn next_schedule_time_family() -> FamilyGenerator<CronJob> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_cronjob_next_schedule_time",
            "Next time the cronjob should be scheduled. The time after lastScheduleTime, or after the cron job's creation time if it's never scheduled. Use this to determine if the job is delayed.",
            Stability::Stable,
        ),
        |o: &CronJob| next_schedule_time(o).map(|t| Sample::new("", t)).into_iter().collect(),
    )
}

fn last_schedule_time_family() -> FamilyGenerator<CronJob> {
    FamilyGenerator::new(
        FamilyGeneratorDescriptor::gauge(
            "kube_cronjob_status_last_schedule_time",
            "LastScheduleTime keeps information of when was the last time the job was successfully scheduled.",
            Stability::Stable,
        ),
        |o: &CronJob| {
            o.status
                .as_ref()
                .and_then(|s| s.last_schedule_time.as_ref())
                .map(|t| Sample::new("", quantity::unix_seconds(t.0.timestamp())))
                .into_iter()
                .collect()
        },
    )
}

pub fn generators(allow_labels: Vec<String>, allow_annotations: Vec<String>) -> Vec<FamilyGenerator<CronJob>> {
    vec![
        info_family(),
        suspend_family(),
        next_schedule_time_family(),
        last_schedule_time_family(),
        created_family("kube_cronjob_created", |o: &CronJob| &o.metadata),
        labels_family("kube_cronjob_labels", allow_labels, |o: &CronJob| &o.metadata),
        annotations_family("kube_cronjob_annotations", allow_annotations, |o: &CronJob| &o.metadata),
        owner_family("kube_cronjob_owner", |o: &CronJob| &o.metadata),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::batch::v1::{CronJobSpec, CronJobStatus, JobTemplateSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
    use ksm_core::Composer;

    fn scenario_cronjob() -> CronJob {
        CronJob {
            metadata: ObjectMeta {
                name: Some("ActiveRunningCronJobWithTZ1".to_string()),
                namespace: Some("ns1".to_string()),
                ..Default::default()
            },
            spec: Some(CronJobSpec {
                schedule: "0 */6 * * *".to_string(),
                time_zone: Some("Asia/Shanghai".to_string()),
                job_template: JobTemplateSpec::default(),
                ..Default::default()
            }),
            status: Some(CronJobStatus {
                last_schedule_time: Some(Time(
                    chrono::DateTime::from_timestamp(1_520_742_896, 0).unwrap(),
                )),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn scenario_four_cronjob_with_time_zone() {
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&scenario_cronjob());

        let info = families.iter().find(|f| f.name == "kube_cronjob_info").unwrap();
        assert!(info.samples[0]
            .labels()
            .contains(&("timezone".to_string(), "Asia/Shanghai".to_string())));

        let next = families
            .iter()
            .find(|f| f.name == "kube_cronjob_next_schedule_time")
            .unwrap();
        assert_eq!(next.samples.len(), 1);
        assert_eq!(next.samples[0].value, 1_520_762_400.0);
    }

    #[test]
    fn suspended_cronjob_omits_next_schedule_time() {
        let mut cj = scenario_cronjob();
        cj.spec.as_mut().unwrap().suspend = Some(true);
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&cj);
        let next = families
            .iter()
            .find(|f| f.name == "kube_cronjob_next_schedule_time")
            .unwrap();
        assert!(next.samples.is_empty());
    }

    #[test]
    fn malformed_schedule_omits_sample_instead_of_failing() {
        let mut cj = scenario_cronjob();
        cj.spec.as_mut().unwrap().schedule = "not a schedule".to_string();
        let composer = Composer::new(generators(vec![], vec![]), identity());
        let families = composer.compose(&cj);
        let next = families
            .iter()
            .find(|f| f.name == "kube_cronjob_next_schedule_time")
            .unwrap();
        assert!(next.samples.is_empty());
    }
}
