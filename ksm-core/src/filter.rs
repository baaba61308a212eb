//! Family generator filter.

use crate::family::StabilityFloor;
use crate::generator::{FamilyGenerator, FamilyGeneratorDescriptor};
use std::collections::HashSet;

/// An explicit allow/deny list of family names, applied together with an
/// optional minimum-stability threshold. A family is kept iff it passes
/// both. Built once per store construction, never per-sample.
#[derive(Debug, Clone, Default)]
pub struct FamilyGeneratorFilter {
    allow: Option<HashSet<String>>,
    deny: HashSet<String>,
    min_stability: Option<StabilityFloor>,
}

impl FamilyGeneratorFilter {
    /// Filter that keeps everything — the default when the builder's
    /// options specify no allow/deny list and no stability floor.
    pub fn allow_all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_allow_list(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allow = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_deny_list(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.deny = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_min_stability(mut self, floor: StabilityFloor) -> Self {
        self.min_stability = Some(floor);
        self
    }

    fn keeps(&self, descriptor: &FamilyGeneratorDescriptor) -> bool {
        if self.deny.contains(&descriptor.name) {
            return false;
        }
        if let Some(allow) = &self.allow {
            if !allow.contains(&descriptor.name) {
                return false;
            }
        }
        if let Some(floor) = &self.min_stability {
            if !descriptor.stability.is_at_least(floor) {
                return false;
            }
        }
        true
    }

    /// Applies the filter to a generator list, in order.
    pub fn apply<K>(&self, generators: Vec<FamilyGenerator<K>>) -> Vec<FamilyGenerator<K>> {
        generators.into_iter().filter(|g| self.keeps(&g.descriptor)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Stability;
    use crate::sample::Sample;

    fn gen(name: &str, stability: Stability) -> FamilyGenerator<()> {
        FamilyGenerator::new(
            FamilyGeneratorDescriptor::gauge(name, "help", stability),
            |_: &()| vec![Sample::new("", 1.0)],
        )
    }

    #[test]
    fn allow_all_keeps_everything() {
        let gens = vec![gen("a", Stability::Alpha), gen("b", Stability::Stable)];
        let kept = FamilyGeneratorFilter::allow_all().apply(gens);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn deny_list_removes_named_family() {
        let gens = vec![gen("a", Stability::Stable), gen("b", Stability::Stable)];
        let kept = FamilyGeneratorFilter::allow_all().with_deny_list(["a"]).apply(gens);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].descriptor.name, "b");
    }

    #[test]
    fn stability_floor_drops_alpha_families() {
        let gens = vec![gen("a", Stability::Alpha), gen("b", Stability::Stable)];
        let kept = FamilyGeneratorFilter::allow_all()
            .with_min_stability(StabilityFloor::Stable)
            .apply(gens);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].descriptor.name, "b");
    }

    #[test]
    fn allow_list_is_exclusive() {
        let gens = vec![gen("a", Stability::Stable), gen("b", Stability::Stable)];
        let kept = FamilyGeneratorFilter::allow_all().with_allow_list(["b"]).apply(gens);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].descriptor.name, "b");
    }
}
