//! Custom-resource factories: the extension point that lets a host register
//! additional kinds into the builder's kind map at setup time.
//!
//! Group-version-resource discovery for a custom resource is out of scope
//! for this crate — a factory is handed a fully scoped
//! [`CustomResourceContext`] and is responsible for constructing its own
//! `kube::Api`/`ApiResource` pair, typically over `kube::core::DynamicObject`,
//! however the host already knows to resolve it.

use crate::config::Config;
use crate::self_metrics::SelfMetricsWriter;
use ksm_core::key::ShardId;
use ksm_core::{ErasedKindWriter, FamilyGeneratorFilter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared context a [`CustomResourceFactory`] needs to wire its own
/// reflector(s) — everything [`crate::builder::Builder`] already assembled
/// for built-in kinds, handed over instead of re-derived by the factory.
pub struct CustomResourceContext<'a> {
    pub client: &'a kube::Client,
    pub config: &'a Config,
    pub filter: &'a FamilyGeneratorFilter,
    pub shard: Option<ShardId>,
    pub self_metrics: &'a Arc<SelfMetricsWriter>,
    pub cancel: &'a CancellationToken,
    /// This kind's allow-listed label keys, already wildcard-expanded.
    pub allow_labels: Vec<String>,
    /// This kind's allow-listed annotation keys, already wildcard-expanded.
    pub allow_annotations: Vec<String>,
}

/// A custom-resource kind: `(name, expected type, list-watch factory,
/// generator factory)` collapsed into one trait object. Registered into
/// the builder's kind map at setup time, before any reflector starts;
/// a name collision with a built-in [`ksm_kinds::KindName`] makes the
/// custom factory win dispatch.
pub trait CustomResourceFactory: Send + Sync {
    /// Wire name; participates in `Config::enabled_kinds` exactly like a
    /// built-in kind's `KindName::as_str()`.
    fn name(&self) -> &str;

    /// Builds this kind's reflector(s), spawning them onto the current
    /// Tokio runtime scoped to `ctx.cancel`, and returns the writer the
    /// [`crate::builder::Builder`] registers with the [`ksm_core::Exposer`].
    fn build(&self, ctx: &CustomResourceContext<'_>) -> Arc<dyn ErasedKindWriter>;
}
