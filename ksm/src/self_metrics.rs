//! The `kind=self` writer: shard placement and per-kind list/watch counters,
//! exposed through the same `Exposer::write_all` path as every object kind
//! rather than a side channel.

use ksm_core::{Family, FamilyHeader, KindCounters, Sample, SampleType, Stability};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::sync::Arc;

fn header(name: &str, help: &str, ty: SampleType) -> FamilyHeader {
    FamilyHeader {
        name: name.to_string(),
        help: help.to_string(),
        ty,
        stability: Stability::Stable,
    }
}

/// Registers one [`KindCounters`] per built kind so `render` can snapshot
/// them without the builder holding onto the writer itself.
#[derive(Default)]
pub struct SelfMetricsWriter {
    shard_ordinal: u64,
    shard_total: u64,
    counters: RwLock<HashMap<String, Arc<KindCounters>>>,
}

impl SelfMetricsWriter {
    pub fn new(shard_ordinal: u64, shard_total: u64) -> Self {
        Self {
            shard_ordinal,
            shard_total,
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Called once per kind as the builder wires its reflectors.
    pub fn register(&self, kind_name: impl Into<String>, counters: Arc<KindCounters>) {
        self.counters.write().insert(kind_name.into(), counters);
    }
}

impl ksm_core::ErasedKindWriter for SelfMetricsWriter {
    fn kind_name(&self) -> &str {
        "self"
    }

    fn render(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();

        header(
            "kube_state_metrics_shard_ordinal",
            "Shard ordinal of this instance; always zero when unsharded.",
            SampleType::Gauge,
        )
        .render_into(&mut buf)?;
        Sample::new("kube_state_metrics_shard_ordinal", self.shard_ordinal as f64).render_into(&mut buf)?;

        header(
            "kube_state_metrics_total_shards",
            "Total number of shards; one when unsharded.",
            SampleType::Gauge,
        )
        .render_into(&mut buf)?;
        Sample::new("kube_state_metrics_total_shards", self.shard_total as f64).render_into(&mut buf)?;

        // Sorted by kind name so output is byte-stable across calls.
        let snapshot: BTreeMap<String, Arc<KindCounters>> =
            self.counters.read().iter().map(|(k, v)| (k.clone(), Arc::clone(v))).collect();

        let counter_families: &[(&str, &str, fn(&ksm_core::KindCountersSnapshot) -> u64)] = &[
            (
                "kube_state_metrics_list_total",
                "Number of list operations attempted, by kind.",
                |s| s.lists_attempted,
            ),
            (
                "kube_state_metrics_list_errors_total",
                "Number of list operations that errored, by kind.",
                |s| s.lists_errored,
            ),
            (
                "kube_state_metrics_watch_total",
                "Number of watch operations attempted, by kind.",
                |s| s.watches_attempted,
            ),
            (
                "kube_state_metrics_watch_errors_total",
                "Number of watch operations that errored, by kind.",
                |s| s.watches_errored,
            ),
            (
                "kube_state_metrics_items_observed_total",
                "Number of objects observed across list responses, by kind.",
                |s| s.items_observed,
            ),
            (
                "kube_state_metrics_watch_events_total",
                "Number of watch events observed, by kind.",
                |s| s.events_observed,
            ),
        ];

        for (name, help, extract) in counter_families {
            header(name, help, SampleType::Counter).render_into(&mut buf)?;
            let family = Family::new(*name).with_samples(snapshot.iter().map(|(kind, counters)| {
                Sample::new(*name, extract(&counters.snapshot()) as f64).with_label("kind", kind.clone())
            }));
            family.render_into(&mut buf)?;
        }

        header(
            "kube_state_metrics_watch_cache_active",
            "Whether the list-watch transport is configured to read from the API server's watch cache, by kind. Read-only hint, not a behavior change.",
            SampleType::Gauge,
        )
        .render_into(&mut buf)?;
        let cache_family = Family::new("kube_state_metrics_watch_cache_active").with_samples(
            snapshot.iter().map(|(kind, counters)| {
                let active = counters.snapshot().using_server_cached_reads;
                Sample::new("kube_state_metrics_watch_cache_active", if active { 1.0 } else { 0.0 })
                    .with_label("kind", kind.clone())
            }),
        );
        cache_family.render_into(&mut buf)?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn renders_shard_gauges_and_registered_kind_counters() {
        let writer = SelfMetricsWriter::new(1, 3);
        let counters = Arc::new(KindCounters::default());
        counters.lists_attempted.fetch_add(2, Ordering::Relaxed);
        counters.items_observed.fetch_add(5, Ordering::Relaxed);
        writer.register("pods", Arc::clone(&counters));

        use ksm_core::ErasedKindWriter;
        let rendered = writer.render().unwrap();
        let text = String::from_utf8(rendered).unwrap();

        assert!(text.contains("kube_state_metrics_shard_ordinal 1\n"));
        assert!(text.contains("kube_state_metrics_total_shards 3\n"));
        assert!(text.contains("kube_state_metrics_list_total{kind=\"pods\"} 2\n"));
        assert!(text.contains("kube_state_metrics_items_observed_total{kind=\"pods\"} 5\n"));
    }

    #[test]
    fn renders_server_cache_hint_gauge_per_kind() {
        let writer = SelfMetricsWriter::new(0, 1);
        let counters = Arc::new(KindCounters::default());
        counters.set_using_server_cached_reads(true);
        writer.register("nodes", Arc::clone(&counters));

        use ksm_core::ErasedKindWriter;
        let rendered = writer.render().unwrap();
        let text = String::from_utf8(rendered).unwrap();
        assert!(text.contains("kube_state_metrics_watch_cache_active{kind=\"nodes\"} 1\n"));
    }

    #[test]
    fn kind_name_is_self() {
        use ksm_core::ErasedKindWriter;
        assert_eq!(SelfMetricsWriter::new(0, 1).kind_name(), "self");
    }
}
