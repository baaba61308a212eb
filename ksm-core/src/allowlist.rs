//! Label/annotation allow-list resolution.

use crate::generator::sanitize_label_key;
use crate::sample::Sample;
use std::collections::{BTreeMap, HashMap};

/// The distinguished wildcard key that expands to every enabled kind.
pub const WILDCARD: &str = "*";

/// Kind-name → allow-listed key sequence, after wildcard expansion.
///
/// Expansion is idempotent: once the `"*"` entry has been consumed there is
/// nothing left for a second [`AllowListMap::expand`] to do, so
/// `expand(expand(raw)) == expand(raw)`.
#[derive(Debug, Clone, Default)]
pub struct AllowListMap {
    per_kind: HashMap<String, Vec<String>>,
}

impl AllowListMap {
    pub fn expand(raw: &HashMap<String, Vec<String>>, enabled_kinds: &[String]) -> Self {
        let mut per_kind = raw.clone();
        per_kind.remove(WILDCARD);
        if let Some(wildcard_keys) = raw.get(WILDCARD) {
            for kind in enabled_kinds {
                per_kind.entry(kind.clone()).or_insert_with(|| wildcard_keys.clone());
            }
        }
        Self { per_kind }
    }

    pub fn keys_for(&self, kind: &str) -> &[String] {
        self.per_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Builds the samples for a label/annotation allow-list family:
/// one label pair per
/// allow-listed key present on the object, value `1`. An empty allow list
/// emits no samples — it is never "emit all".
pub fn allow_listed_samples(prefix: &str, allowed_keys: &[String], object_map: &BTreeMap<String, String>) -> Vec<Sample> {
    allowed_keys
        .iter()
        .filter_map(|key| {
            object_map.get(key).map(|value| {
                Sample::new("", 1.0).with_label(sanitize_label_key(prefix, key), value.clone())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wildcard_expands_to_every_enabled_kind() {
        let mut raw = HashMap::new();
        raw.insert(WILDCARD.to_string(), vec!["team".to_string()]);
        let expanded = AllowListMap::expand(&raw, &kinds(&["pods", "nodes"]));
        assert_eq!(expanded.keys_for("pods"), &["team".to_string()]);
        assert_eq!(expanded.keys_for("nodes"), &["team".to_string()]);
    }

    #[test]
    fn explicit_kind_entry_overrides_wildcard() {
        let mut raw = HashMap::new();
        raw.insert(WILDCARD.to_string(), vec!["team".to_string()]);
        raw.insert("pods".to_string(), vec!["app".to_string()]);
        let expanded = AllowListMap::expand(&raw, &kinds(&["pods", "nodes"]));
        assert_eq!(expanded.keys_for("pods"), &["app".to_string()]);
        assert_eq!(expanded.keys_for("nodes"), &["team".to_string()]);
    }

    #[test]
    fn expansion_is_idempotent() {
        let mut raw = HashMap::new();
        raw.insert(WILDCARD.to_string(), vec!["team".to_string()]);
        let once = AllowListMap::expand(&raw, &kinds(&["pods"]));
        let raw_again: HashMap<String, Vec<String>> =
            once.per_kind.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let twice = AllowListMap::expand(&raw_again, &kinds(&["pods"]));
        assert_eq!(once.per_kind, twice.per_kind);
    }

    #[test]
    fn empty_allow_list_emits_nothing() {
        let obj: BTreeMap<String, String> = [("team".to_string(), "payments".to_string())].into();
        let samples = allow_listed_samples("label_", &[], &obj);
        assert!(samples.is_empty());
    }

    #[test]
    fn present_key_emits_one_sample_with_value_one() {
        let obj: BTreeMap<String, String> = [("team".to_string(), "payments".to_string())].into();
        let samples = allow_listed_samples("label_", &["team".to_string()], &obj);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[0].labels(), &[("label_team".to_string(), "payments".to_string())]);
    }

    #[test]
    fn missing_key_emits_no_sample() {
        let obj: BTreeMap<String, String> = BTreeMap::new();
        let samples = allow_listed_samples("label_", &["team".to_string()], &obj);
        assert!(samples.is_empty());
    }
}
