//! Object key and shard-identity types.

use std::fmt;

/// Store index: namespace (empty for cluster-scoped kinds) + name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: Option<impl Into<String>>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            name: name.into(),
        }
    }

    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// (ordinal, total) shard identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardId {
    pub ordinal: u64,
    pub total: u64,
}

impl ShardId {
    pub fn unsharded() -> Self {
        Self { ordinal: 0, total: 1 }
    }

    pub fn new(ordinal: u64, total: u64) -> Result<Self, ShardIdError> {
        if total == 0 {
            return Err(ShardIdError::ZeroTotal);
        }
        if ordinal >= total {
            return Err(ShardIdError::OrdinalOutOfRange { ordinal, total });
        }
        Ok(Self { ordinal, total })
    }

    /// Whether `uid` belongs to this shard's ordinal. Identity when
    /// `total <= 1` means unsharded.
    pub fn owns(&self, uid: &str) -> bool {
        if self.total <= 1 {
            return true;
        }
        xxhash_rust::xxh3::xxh3_64_with_seed(uid.as_bytes(), 0) % self.total == self.ordinal
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShardIdError {
    #[error("total shard count must be at least 1")]
    ZeroTotal,
    #[error("shard ordinal {ordinal} is out of range for total {total}")]
    OrdinalOutOfRange { ordinal: u64, total: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_filter_owns_everything_when_total_is_one() {
        let s = ShardId::unsharded();
        assert!(s.owns("any-uid"));
    }

    #[test]
    fn shard_partition_is_exhaustive_and_disjoint() {
        let total = 4u64;
        let shards: Vec<ShardId> = (0..total).map(|o| ShardId::new(o, total).unwrap()).collect();
        let uids: Vec<String> = (0..1000).map(|i| format!("uid-{i}")).collect();

        let mut union = HashSet::new();
        for uid in &uids {
            let owners: Vec<_> = shards.iter().filter(|s| s.owns(uid)).collect();
            assert_eq!(owners.len(), 1, "uid {uid} must have exactly one owner");
            union.insert(uid.clone());
        }
        assert_eq!(union.len(), uids.len());
    }

    #[test]
    fn shard_partition_is_roughly_balanced() {
        let total = 4u64;
        let shards: Vec<ShardId> = (0..total).map(|o| ShardId::new(o, total).unwrap()).collect();
        let uids: Vec<String> = (0..1000).map(|i| format!("uid-{i}")).collect();
        for s in &shards {
            let count = uids.iter().filter(|u| s.owns(u)).count();
            assert!((count as i64 - 250).abs() <= 25, "count {count} too far from 250");
        }
    }

    #[test]
    fn rejects_zero_total() {
        assert_eq!(ShardId::new(0, 0), Err(ShardIdError::ZeroTotal));
    }

    #[test]
    fn rejects_ordinal_out_of_range() {
        assert_eq!(
            ShardId::new(2, 2),
            Err(ShardIdError::OrdinalOutOfRange { ordinal: 2, total: 2 })
        );
    }
}
