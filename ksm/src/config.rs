//! Host-facing configuration surface.
//!
//! `Config` is `serde::Deserialize` so a host process may load it from
//! YAML/JSON if it chooses; construction from code (`Config::default()` plus
//! field assignment, or the demos' inline literals) is equally supported.
//! This crate never reads a file, an env var, or a CLI flag itself — that
//! wiring, like the `kube::Client` itself, belongs to the host.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serde-friendly mirror of [`ksm_core::StabilityFloor`] — that type lives in
/// a crate with no `serde` dependency, so the config surface owns the wire
/// representation and converts at builder time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityFloor {
    Alpha,
    Stable,
}

impl From<StabilityFloor> for ksm_core::StabilityFloor {
    fn from(floor: StabilityFloor) -> Self {
        match floor {
            StabilityFloor::Alpha => ksm_core::StabilityFloor::Alpha,
            StabilityFloor::Stable => ksm_core::StabilityFloor::Stable,
        }
    }
}

/// Per-kind label/annotation allow-lists. An absent entry for a kind means
/// "no labels/annotations allow-listed for this kind" — allow-listing is
/// opt-in, never "emit everything".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindAllowList {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// This replica's position in a sharded deployment. Absent (the default)
/// means unsharded: this replica owns every object of every enabled kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShardConfig {
    pub ordinal: u64,
    pub total: u64,
}

/// Namespace scope for every namespaced kind. `All` lists/watches
/// cluster-wide; `Only` fans each namespaced kind out into one store per
/// named namespace so a store can be queried/reset independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceScope {
    #[default]
    All,
    Only(Vec<String>),
}

/// The full construction surface for an [`crate::builder::Builder`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Wire names (`KindName::as_str()`) of the kinds to build stores for.
    /// Must be non-empty and every entry must parse via `KindName::from_str`.
    pub enabled_kinds: Vec<String>,

    /// Per-kind label/annotation allow-lists, keyed by wire name, or by the
    /// wildcard key `"*"` which [`ksm_core::AllowListMap`] expands to every
    /// enabled kind at build time. An explicit per-kind entry always wins
    /// over the wildcard for that kind.
    #[serde(default)]
    pub allow_lists: HashMap<String, KindAllowList>,

    /// Field selector fragments forwarded to every reflector's list/watch
    /// calls. Multiple non-empty fragments are AND-merged by joining with
    /// `,` — the Kubernetes field-selector grammar already treats a
    /// comma-joined selector as a conjunction, so merging needs no parser.
    #[serde(default)]
    pub field_selector: Vec<String>,

    /// Family names to deny outright, applied before the stability floor.
    #[serde(default)]
    pub deny_families: Vec<String>,

    /// Drop any family below this stability. `None` keeps every family.
    #[serde(default)]
    pub min_stability: Option<StabilityFloor>,

    #[serde(default)]
    pub namespace_scope: NamespaceScope,

    #[serde(default)]
    pub shard: Option<ShardConfig>,

    /// Forwarded to every reflector's `ListWatchOptions::use_server_cached_reads`.
    #[serde(default)]
    pub use_server_cached_reads: bool,

    /// Forwarded to every reflector's list calls as a page size; `None`
    /// means no paging. Page-limit exhaustion is logged, never fatal.
    #[serde(default)]
    pub list_page_limit: Option<u32>,

    /// Register the `kind=self` writer (shard ordinal/total, list/watch
    /// counters) alongside the object-kind writers.
    #[serde(default = "default_true")]
    pub self_metrics: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Resolves the family generator filter this config describes: the
    /// deny-list, plus an optional stability floor. Always `Some` — every
    /// `Config` reachable through this crate's public surface (`Default`,
    /// struct-update syntax, or `serde` deserialization with its field
    /// defaults) has a well-formed `deny_families`/`min_stability`, so there
    /// is no configuration state this resolves to `None`. `Builder` still
    /// threads the result as an `Option` and panics if it ever sees `None`,
    /// since that can only happen if a caller bypasses this method — a
    /// programmer bug, not a configuration one.
    pub fn resolve_family_generator_filter(&self) -> Option<ksm_core::FamilyGeneratorFilter> {
        let mut filter = ksm_core::FamilyGeneratorFilter::allow_all();
        if !self.deny_families.is_empty() {
            filter = filter.with_deny_list(self.deny_families.clone());
        }
        if let Some(floor) = self.min_stability {
            filter = filter.with_min_stability(floor.into());
        }
        Some(filter)
    }

    /// `None` non-empty fragments filtered out, then comma-joined. `None`
    /// if every fragment is empty or the list itself is empty, so the
    /// reflector's `ListWatchOptions::field_selector` stays unset rather
    /// than carrying a degenerate empty string.
    pub fn merged_field_selector(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .field_selector
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_field_selector_is_none_when_empty() {
        let config = Config::default();
        assert_eq!(config.merged_field_selector(), None);
    }

    #[test]
    fn merged_field_selector_drops_empty_fragments_and_ands_the_rest() {
        let config = Config {
            field_selector: vec!["status.phase=Running".to_string(), String::new(), "spec.nodeName=node1".to_string()],
            ..Config::default()
        };
        assert_eq!(
            config.merged_field_selector(),
            Some("status.phase=Running,spec.nodeName=node1".to_string())
        );
    }

    #[test]
    fn resolve_family_generator_filter_is_never_null() {
        assert!(Config::default().resolve_family_generator_filter().is_some());
    }

    #[test]
    fn resolve_family_generator_filter_applies_deny_list_and_stability_floor() {
        use ksm_core::{FamilyGenerator, FamilyGeneratorDescriptor, Sample, Stability};

        let config = Config {
            deny_families: vec!["kube_widget_denied".to_string()],
            min_stability: Some(StabilityFloor::Stable),
            ..Config::default()
        };
        let filter = config.resolve_family_generator_filter().unwrap();

        let generators = vec![
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge("kube_widget_denied", "help", Stability::Stable),
                |_: &()| vec![Sample::new("kube_widget_denied", 1.0)],
            ),
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge("kube_widget_alpha", "help", Stability::Alpha),
                |_: &()| vec![Sample::new("kube_widget_alpha", 1.0)],
            ),
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge("kube_widget_kept", "help", Stability::Stable),
                |_: &()| vec![Sample::new("kube_widget_kept", 1.0)],
            ),
        ];
        let kept = filter.apply(generators);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].descriptor.name, "kube_widget_kept");
    }
}
