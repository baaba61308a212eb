//! The sample/family value types shared by every kind.

use std::io::{self, Write};

/// How a family's numeric value should be interpreted by a scraper.
///
/// Mirrors the Prometheus exposition format's `# TYPE` line. `UntypedCounter`
/// exists for the handful of fields that are monotonic counters on the
/// object itself (e.g. restart counts) but that upstream has historically
/// exposed as `gauge` for compatibility; we keep the distinction explicit
/// rather than silently picking one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    Gauge,
    Counter,
    UntypedCounter,
}

impl SampleType {
    pub fn exposition_str(self) -> &'static str {
        match self {
            SampleType::Gauge => "gauge",
            SampleType::Counter => "counter",
            SampleType::UntypedCounter => "untyped",
        }
    }
}

/// One labeled observation. Label keys are unique within a sample; the
/// order they were pushed in is preserved and is stable for the sample's
/// lifetime (callers build samples with [`Sample::new`] then
/// [`Sample::with_label`], never mutate keys after the fact).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    labels: Vec<(String, String)>,
    pub value: f64,
}

impl Sample {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            value,
        }
    }

    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    /// Renders `name{k="v",...} value\n` in Prometheus text exposition format.
    pub fn render_into(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", self.name)?;
        if !self.labels.is_empty() {
            out.write_all(b"{")?;
            for (i, (k, v)) in self.labels.iter().enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                write!(out, "{k}=\"{}\"", escape_label_value(v))?;
            }
            out.write_all(b"}")?;
        }
        writeln!(out, " {}", format_value(self.value))
    }
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        // Prometheus exposition format has no opinion on float formatting beyond
        // parseability; ryu-style shortest-roundtrip isn't pulled in here, a
        // plain `{}` format matches what every `prometheus`-ecosystem exporter
        // in the corpus does for `f64`.
        format!("{v}")
    }
}

/// Escapes `\`, `"`, and newlines per the exposition format's string escaping
/// rule.
pub fn escape_label_value(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_labels_in_push_order() {
        let s = Sample::new("kube_pod_info", 1.0)
            .with_label("namespace", "ns4")
            .with_label("pod", "p1");
        let mut buf = Vec::new();
        s.render_into(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "kube_pod_info{namespace=\"ns4\",pod=\"p1\"} 1\n"
        );
    }

    #[test]
    fn renders_bare_sample_without_braces() {
        let s = Sample::new("kube_shard_ordinal", 2.0);
        let mut buf = Vec::new();
        s.render_into(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "kube_shard_ordinal 2\n");
    }

    #[test]
    fn escapes_backslash_quote_and_newline() {
        assert_eq!(escape_label_value("a\\b\"c\nd"), "a\\\\b\\\"c\\nd");
    }
}
