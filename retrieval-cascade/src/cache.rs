use moka::sync::Cache;

/// Deterministic content hash used as a cache key, replacing the identity
/// hashing the original system fell back to for non-string inputs. Truncated
/// to 64 bits: collisions are
/// acceptable for a cache (a collision costs a recompute, not correctness),
/// and 64 bits keeps the key cheap to move and compare.
pub fn hash_str(input: &str) -> u64 {
    let digest = blake3::hash(input.as_bytes());
    let bytes = digest.as_bytes();
    u64::from_le_bytes(bytes[0..8].try_into().expect("blake3 digest is 32 bytes"))
}

/// Thin wrapper around a `moka::sync::Cache` keyed by `u64`. Exists mostly
/// so callers of [`crate::engine::CascadeEngine`] don't have to name the
/// `moka` type directly.
#[derive(Clone)]
pub struct InferenceCache<V: Clone + Send + Sync + 'static> {
    inner: Cache<u64, V>,
}

impl<V: Clone + Send + Sync + 'static> InferenceCache<V> {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    pub fn get(&self, key: u64) -> Option<V> {
        self.inner.get(&key)
    }

    pub fn insert(&self, key: u64, value: V) {
        self.inner.insert(key, value);
    }
}
