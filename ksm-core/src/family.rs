//! Family / stability / header types.

use crate::sample::{Sample, SampleType};
use std::io::{self, Write};

/// Stability contract attached to a family, rendered into its `# HELP` line
/// as a leading marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stability {
    Alpha,
    Stable,
    Deprecated { since: String },
}

impl Stability {
    fn marker(&self) -> String {
        match self {
            Stability::Alpha => String::new(),
            Stability::Stable => "[STABLE] ".to_string(),
            Stability::Deprecated { since } => format!("(Deprecated since {since}) "),
        }
    }

    pub fn is_at_least(&self, floor: &StabilityFloor) -> bool {
        match floor {
            StabilityFloor::Alpha => true,
            StabilityFloor::Stable => matches!(self, Stability::Stable | Stability::Deprecated { .. }),
        }
    }
}

/// Minimum-stability threshold used by the family generator filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityFloor {
    Alpha,
    Stable,
}

/// A named group of samples sharing a metric name, help text, type, and
/// stability tag. May contain zero samples.
#[derive(Debug, Clone)]
pub struct Family {
    pub name: String,
    pub samples: Vec<Sample>,
}

impl Family {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: impl IntoIterator<Item = Sample>) -> Self {
        self.samples.extend(samples);
        self
    }

    pub fn render_into(&self, out: &mut impl Write) -> io::Result<()> {
        for s in &self.samples {
            s.render_into(out)?;
        }
        Ok(())
    }
}

/// The `# HELP` / `# TYPE` preamble for one family, derived once from a
/// generator descriptor and reused for every store that carries the family.
#[derive(Debug, Clone)]
pub struct FamilyHeader {
    pub name: String,
    pub help: String,
    pub ty: SampleType,
    pub stability: Stability,
}

impl FamilyHeader {
    pub fn render_into(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "# HELP {} {}{}",
            self.name,
            self.stability.marker(),
            self.help
        )?;
        writeln!(out, "# TYPE {} {}", self.name, self.ty.exposition_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_marker_precedes_help_text() {
        let h = FamilyHeader {
            name: "kube_pod_info".into(),
            help: "Information about pod.".into(),
            ty: SampleType::Gauge,
            stability: Stability::Stable,
        };
        let mut buf = Vec::new();
        h.render_into(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "# HELP kube_pod_info [STABLE] Information about pod.\n# TYPE kube_pod_info gauge\n"
        );
    }

    #[test]
    fn deprecated_marker_carries_version() {
        let h = FamilyHeader {
            name: "kube_old_thing".into(),
            help: "Old thing.".into(),
            ty: SampleType::Gauge,
            stability: Stability::Deprecated {
                since: "2.9.0".into(),
            },
        };
        let mut buf = Vec::new();
        h.render_into(&mut buf).unwrap();
        assert!(String::from_utf8(buf)
            .unwrap()
            .starts_with("# HELP kube_old_thing (Deprecated since 2.9.0) "));
    }

    #[test]
    fn stability_floor_excludes_alpha_when_stable_only() {
        assert!(!Stability::Alpha.is_at_least(&StabilityFloor::Stable));
        assert!(Stability::Stable.is_at_least(&StabilityFloor::Stable));
        assert!(Stability::Alpha.is_at_least(&StabilityFloor::Alpha));
    }
}
