//! Ingestion-and-generation engine for a cluster-state metrics exporter.
//! This crate has no dependency on a concrete orchestration API
//! client — it consumes the [`watch::ListWatch`] trait, which the facade
//! crate implements against the real `kube` crate.

pub mod allowlist;
pub mod error;
pub mod family;
pub mod filter;
pub mod generator;
pub mod instrumentation;
pub mod key;
pub mod reflector;
pub mod sample;
pub mod shard;
pub mod store;
pub mod watch;
pub mod writer;

pub use allowlist::{AllowListMap, WILDCARD};
pub use error::GeneratorError;
pub use family::{Family, FamilyHeader, Stability, StabilityFloor};
pub use filter::FamilyGeneratorFilter;
pub use generator::{Composer, FamilyGenerator, FamilyGeneratorDescriptor, IdentityLabelFn};
pub use instrumentation::{InstrumentedListWatch, KindCounters, KindCountersSnapshot};
pub use key::{ObjectKey, ShardId, ShardIdError};
pub use reflector::{Reflector, ReflectorState};
pub use sample::{Sample, SampleType};
pub use shard::ShardedListWatch;
pub use store::{Store, Writer};
pub use watch::{ListResult, ListWatch, ListWatchOptions, TransportError, WatchEvent};
pub use writer::{ErasedKindWriter, Exposer, KindWriter};
