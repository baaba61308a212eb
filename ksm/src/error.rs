//! Configuration errors returned from [`crate::builder::Builder::build`].

/// Everything that can go wrong turning a [`crate::config::Config`] into a
/// running [`ksm_core::Exposer`], without ever contacting the cluster.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown kind name {0:?}")]
    UnknownKind(String),

    #[error("no kinds enabled; at least one must be configured")]
    NoKindsEnabled,

    #[error(transparent)]
    Shard(#[from] ksm_core::ShardIdError),
}
