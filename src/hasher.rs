use core::hash::BuildHasher;
use core::hash::Hash;

/// A caller-supplied hash function for keys of type `K`.
///
/// The table computes a key's hash once, on insertion, and caches it on the
/// entry; growth never calls the hasher again. The function must return the
/// same hash for equal keys for as long as they are stored. It does not have
/// to be collision resistant: colliding keys share a chain.
///
/// Any `Fn(&K) -> u64` is a `KeyHasher<K>`:
///
/// ```rust
/// use probe_table::KeyHasher;
///
/// let identity = |key: &u64| *key;
/// assert_eq!(identity.hash_key(&42), 42);
/// ```
pub trait KeyHasher<K: ?Sized> {
    /// Hashes `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline(always)]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Adapts a hash function that returns signed hashes.
///
/// Negative hashes are negated. `i64::MIN` maps to `2^63`, so the
/// adaptation is exact across the whole signed domain, but `h` and `-h`
/// always collide. Prefer an unsigned hash function where one is available.
///
/// ```rust
/// use probe_table::KeyHasher;
/// use probe_table::hasher::SignedHashFn;
///
/// let hasher = SignedHashFn(|key: &i64| *key);
/// assert_eq!(hasher.hash_key(&-7), 7);
/// assert_eq!(hasher.hash_key(&i64::MIN), 1 << 63);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SignedHashFn<F>(pub F);

impl<K, F> KeyHasher<K> for SignedHashFn<F>
where
    K: ?Sized,
    F: Fn(&K) -> i64,
{
    #[inline(always)]
    fn hash_key(&self, key: &K) -> u64 {
        (self.0)(key).unsigned_abs()
    }
}

/// Hashes `K: Hash` keys with a [`BuildHasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildKeyHasher<S> {
    hash_builder: S,
}

impl<S> BuildKeyHasher<S> {
    /// Wraps `hash_builder`.
    pub fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the wrapped hasher builder.
    pub fn hash_builder(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> KeyHasher<K> for BuildKeyHasher<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline(always)]
    fn hash_key(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultKeyHasher`].
        ///
        /// A fixed-seed foldhash, so hashes are reproducible across runs.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;

        /// A [`KeyHasher`] for any `K: Hash` using [`DefaultHashBuilder`].
        pub type DefaultKeyHasher = BuildKeyHasher<DefaultHashBuilder>;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultKeyHasher`].
        ///
        /// std's SipHash-1-3 with zero keys, so hashes are reproducible
        /// across runs.
        pub type DefaultHashBuilder =
            core::hash::BuildHasherDefault<std::collections::hash_map::DefaultHasher>;

        /// A [`KeyHasher`] for any `K: Hash` using [`DefaultHashBuilder`].
        pub type DefaultKeyHasher = BuildKeyHasher<DefaultHashBuilder>;
    }
}
