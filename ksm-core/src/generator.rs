//! Family generator, composition, and the shared per-object render helpers.

use crate::family::{Family, FamilyHeader, Stability};
use crate::sample::{Sample, SampleType};
use std::sync::Arc;

/// Descriptor half of a generator: name, help, type, stability.
#[derive(Debug, Clone)]
pub struct FamilyGeneratorDescriptor {
    pub name: String,
    pub help: String,
    pub ty: SampleType,
    pub stability: Stability,
}

impl FamilyGeneratorDescriptor {
    pub fn gauge(name: impl Into<String>, help: impl Into<String>, stability: Stability) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ty: SampleType::Gauge,
            stability,
        }
    }

    pub fn counter(name: impl Into<String>, help: impl Into<String>, stability: Stability) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ty: SampleType::Counter,
            stability,
        }
    }
}

/// A pure `object -> samples` render function. Samples here carry only
/// kind-specific labels — the composer prepends identity labels and
/// fills in the sample name from the descriptor, so the `name` field of
/// each returned [`Sample`] is ignored and may be left empty.
pub type RenderFn<K> = Arc<dyn Fn(&K) -> Vec<Sample> + Send + Sync>;

/// A generator: descriptor + render function, for one typed object kind.
#[derive(Clone)]
pub struct FamilyGenerator<K> {
    pub descriptor: FamilyGeneratorDescriptor,
    render: RenderFn<K>,
}

impl<K> FamilyGenerator<K> {
    pub fn new(
        descriptor: FamilyGeneratorDescriptor,
        render: impl Fn(&K) -> Vec<Sample> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            render: Arc::new(render),
        }
    }

    pub fn header(&self) -> FamilyHeader {
        FamilyHeader {
            name: self.descriptor.name.clone(),
            help: self.descriptor.help.clone(),
            ty: self.descriptor.ty,
            stability: self.descriptor.stability.clone(),
        }
    }

    fn render(&self, obj: &K) -> Vec<Sample> {
        (self.render)(obj)
    }
}

/// Prepends identity labels (namespace, object name, and for some kinds
/// `uid`) to every sample of every generator for a kind.
pub type IdentityLabelFn<K> = Arc<dyn Fn(&K) -> Vec<(String, String)> + Send + Sync>;

/// A kind's flattened compose function plus its header sequence. Built once
/// at store-construction time by the builder.
#[derive(Clone)]
pub struct Composer<K> {
    generators: Vec<FamilyGenerator<K>>,
    identity: IdentityLabelFn<K>,
}

impl<K> Composer<K> {
    pub fn new(generators: Vec<FamilyGenerator<K>>, identity: IdentityLabelFn<K>) -> Self {
        Self { generators, identity }
    }

    /// The family preambles in generator-list order.
    pub fn headers(&self) -> Vec<FamilyHeader> {
        self.generators.iter().map(FamilyGenerator::header).collect()
    }

    /// `compose(generators, x) = concat([g(x) for g in generators])` — no
    /// hidden merging across generators.
    pub fn compose(&self, obj: &K) -> Vec<Family> {
        let identity_labels = (self.identity)(obj);
        self.generators
            .iter()
            .map(|g| {
                let samples = g
                    .render(obj)
                    .into_iter()
                    .map(|s| {
                        Sample::new(g.descriptor.name.clone(), s.value)
                            .with_labels(identity_labels.clone())
                            .with_labels(s.labels().to_vec())
                    })
                    .collect();
                Family {
                    name: g.descriptor.name.clone(),
                    samples,
                }
            })
            .collect()
    }
}

/// Expands one "status-condition"-bearing object's condition into the
/// mandatory `{true, false, unknown}` triplet.
///
/// `status` should already be normalized to one of the three strings; an
/// unrecognized value is treated as `"unknown"`.
pub fn condition_triplet(status: &str) -> [Sample; 3] {
    let normalized = match status {
        "true" | "True" => "true",
        "false" | "False" => "false",
        _ => "unknown",
    };
    ["true", "false", "unknown"].map(|label| {
        let value = if label == normalized { 1.0 } else { 0.0 };
        Sample::new("", value).with_label("status", label)
    })
}

/// Label/annotation key sanitization: replace any character outside
/// `[A-Za-z0-9_]` with `_`, ensure the first character is a letter or `_`,
/// and prepend a fixed prefix before sanitizing.
///
/// `sanitize(sanitize(k)) == sanitize(k)` holds because the output alphabet
/// is already a fixed point of the replacement rule and the prefix is
/// idempotent to re-apply only once by construction (callers always sanitize
/// the raw key, never a previously-sanitized one).
pub fn sanitize_label_key(prefix: &str, raw: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + raw.len());
    out.push_str(prefix);
    for c in raw.chars() {
        out.push(if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' });
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Quantity → `f64` conversion helpers.
pub mod quantity {
    /// Milli-units divided by 1000, the convention `k8s_openapi::Quantity`
    /// parses into for CPU (`cores`), memory/storage (`bytes`), and similar
    /// rational quantities.
    pub fn milli_to_f64(milli: i64) -> f64 {
        milli as f64 / 1000.0
    }

    pub fn bool_to_f64(b: bool) -> f64 {
        if b { 1.0 } else { 0.0 }
    }

    pub fn unix_seconds(epoch_seconds: i64) -> f64 {
        epoch_seconds as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Stability;

    #[derive(Clone)]
    struct Obj {
        namespace: String,
        name: String,
        value: f64,
    }

    fn identity() -> IdentityLabelFn<Obj> {
        Arc::new(|o: &Obj| vec![("namespace".into(), o.namespace.clone()), ("pod".into(), o.name.clone())])
    }

    #[test]
    fn compose_concatenates_generators_without_hidden_merging() {
        let gens = vec![
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge("kube_pod_a", "help a", Stability::Stable),
                |o: &Obj| vec![Sample::new("", o.value)],
            ),
            FamilyGenerator::new(
                FamilyGeneratorDescriptor::gauge("kube_pod_b", "help b", Stability::Stable),
                |o: &Obj| vec![Sample::new("", o.value * 2.0)],
            ),
        ];
        let composer = Composer::new(gens, identity());
        let obj = Obj {
            namespace: "ns4".into(),
            name: "p1".into(),
            value: 3.0,
        };
        let families = composer.compose(&obj);
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name, "kube_pod_a");
        assert_eq!(families[0].samples[0].value, 3.0);
        assert_eq!(families[1].name, "kube_pod_b");
        assert_eq!(families[1].samples[0].value, 6.0);
        assert_eq!(
            families[0].samples[0].labels(),
            &[("namespace".to_string(), "ns4".to_string()), ("pod".to_string(), "p1".to_string())]
        );
    }

    #[test]
    fn condition_triplet_sums_to_one() {
        let triplet = condition_triplet("True");
        let sum: f64 = triplet.iter().map(|s| s.value).sum();
        assert_eq!(sum, 1.0);
        assert_eq!(triplet[0].value, 1.0); // "true"
    }

    #[test]
    fn condition_triplet_unrecognized_status_is_unknown() {
        let triplet = condition_triplet("Frobnicating");
        assert_eq!(triplet[2].value, 1.0); // "unknown"
    }

    #[test]
    fn sanitize_replaces_invalid_characters_and_prefixes() {
        assert_eq!(sanitize_label_key("label_", "app.kubernetes.io/name"), "label_app_kubernetes_io_name");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_label_key("label_", "9-weird.key");
        let twice = sanitize_label_key("", &once);
        assert_eq!(once, twice);
    }
}
