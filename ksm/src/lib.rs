//! Construction surface for a cluster-state metrics exporter: configuration,
//! the kube-backed list-watch transport, and the builder that turns the two
//! into a running [`ksm_core::Exposer`].
//!
//! The engine itself — stores, generators, reflectors, sharding — lives in
//! `ksm-core`; the per-kind catalogs live in `ksm-kinds`. This crate is the
//! only one of the three that has an opinion about how objects are actually
//! fetched from a cluster.

pub mod builder;
pub mod config;
pub mod custom;
pub mod error;
pub mod kube_watch;
pub mod self_metrics;

pub use builder::Builder;
pub use config::Config;
pub use custom::{CustomResourceContext, CustomResourceFactory};
pub use error::ConfigError;
pub use kube_watch::KubeListWatch;
pub use self_metrics::SelfMetricsWriter;

pub use ksm_core::Exposer;
