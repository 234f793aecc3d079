use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Address, AddressCache, AddressIter, CacheRegistry, DigestSource, Error, HashChainDigest,
    KeyCursor, KeyIndex, Result, Seed,
};

/// Derives addresses from a seed, one per key index.
///
/// Every lookup goes through the *effective* cache:
///
/// 1. the generator's own cache, if one was set with [`set_cache`];
/// 2. otherwise whatever is installed in its [`CacheRegistry`] (the
///    process-wide one unless [`with_registry`] was used);
/// 3. otherwise no cache at all, and every lookup derives.
///
/// Caching only ever saves work. Results are identical with or without it.
///
/// [`set_cache`]: Self::set_cache
/// [`with_registry`]: Self::with_registry
///
/// # Example
/// ```
/// use addrgen::{AddressGenerator, Seed};
///
/// let generator = AddressGenerator::new(Seed::from("TESTSEED"));
/// let descending = generator.get_addresses(3, 3, -1).unwrap();
///
/// let indices: Vec<_> = descending.iter().map(|a| a.key_index()).collect();
/// assert_eq!(indices, [Some(3), Some(2), Some(1)]);
/// ```
pub struct AddressGenerator<D = HashChainDigest>
where
    D: DigestSource,
{
    seed: Seed,
    digest: D,
    cache: Option<Arc<dyn AddressCache>>,
    registry: Arc<CacheRegistry>,
}

impl AddressGenerator<HashChainDigest> {
    /// Creates a generator for `seed` using the default [`HashChainDigest`]
    /// and the process-wide [`CacheRegistry`].
    pub fn new(seed: Seed) -> Self {
        Self::with_digest(seed, HashChainDigest::default())
    }

    /// Creates a generator using a [`HashChainDigest`] at `security_level`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for an unsupported security level.
    pub fn with_security_level(seed: Seed, security_level: u8) -> Result<Self> {
        Ok(Self::with_digest(seed, HashChainDigest::new(security_level)?))
    }
}

impl<D> AddressGenerator<D>
where
    D: DigestSource,
{
    /// Creates a generator backed by a custom [`DigestSource`].
    pub fn with_digest(seed: Seed, digest: D) -> Self {
        Self {
            seed,
            digest,
            cache: None,
            registry: Arc::clone(CacheRegistry::global()),
        }
    }

    /// Reads the shared cache from `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<CacheRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn digest_source(&self) -> &D {
        &self.digest
    }

    /// The generator's own cache, if one is set.
    ///
    /// This does not report the process-wide cache.
    pub fn cache(&self) -> Option<&Arc<dyn AddressCache>> {
        self.cache.as_ref()
    }

    /// Sets or removes this generator's own cache.
    ///
    /// While set, it shadows the registry's cache for this generator only.
    pub fn set_cache(&mut self, cache: Option<Arc<dyn AddressCache>>) {
        self.cache = cache;
    }

    /// Builder form of [`set_cache`](Self::set_cache).
    pub fn with_cache(mut self, cache: Arc<dyn AddressCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns `count` addresses starting at `start`, moving by `step`
    /// between them.
    ///
    /// Addresses come back in the order visited, so a negative `step` yields
    /// descending key indices.
    ///
    /// # Errors
    /// - [`Error::Validation`] if `start < 0`, `count == 0` or `step == 0`.
    ///   Raised before any cache or derivation work.
    /// - Any error from the digest source or the cache, unchanged.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn get_addresses(
        &self,
        start: KeyIndex,
        count: usize,
        step: i64,
    ) -> Result<Vec<Arc<Address>>> {
        validate_start(start)?;
        if count == 0 {
            return Err(Error::validation("count must be >= 1"));
        }
        let mut cursor = KeyCursor::new(start, step)?;

        let cache = self.effective_cache()?;
        // `count` is unbounded, so the vector grows with the results.
        (0..count)
            .map(|_| self.resolve(cache.as_deref(), cursor.advance()))
            .collect()
    }

    /// Creates a lazy, never-ending iterator of addresses starting at
    /// `start` and moving by `step`.
    ///
    /// Each call to `next` performs one cache-or-derive step. The iterator
    /// never returns `None`; stop consuming it when you have what you need.
    /// Calling this again yields an independent iterator that starts over.
    ///
    /// # Errors
    /// - [`Error::Validation`] if `start < 0` or `step == 0`.
    pub fn create_iterator(&self, start: KeyIndex, step: i64) -> Result<AddressIter<'_, D>> {
        validate_start(start)?;
        Ok(AddressIter::new(self, KeyCursor::new(start, step)?))
    }

    /// Resolves the address at a single key index.
    ///
    /// Unlike [`get_addresses`](Self::get_addresses), negative indices are
    /// accepted here so iterators with a negative step can keep going.
    ///
    /// # Errors
    /// Any error from the digest source or the cache, unchanged.
    pub fn address_at(&self, key_index: KeyIndex) -> Result<Arc<Address>> {
        let cache = self.effective_cache()?;
        self.resolve(cache.as_deref(), key_index)
    }

    /// Derives the address at `key_index`, bypassing every cache.
    ///
    /// # Errors
    /// Any error from the digest source, unchanged.
    pub fn derive_address(&self, key_index: KeyIndex) -> Result<Address> {
        let digest = self.digest.digest(&self.seed, key_index)?;
        Ok(Address::from_digest(&digest))
    }

    /// The local cache if set, else the registry's.
    pub(crate) fn effective_cache(&self) -> Result<Option<Arc<dyn AddressCache>>> {
        match &self.cache {
            Some(local) => Ok(Some(Arc::clone(local))),
            None => self.registry.current(),
        }
    }

    pub(crate) fn resolve(
        &self,
        cache: Option<&dyn AddressCache>,
        key_index: KeyIndex,
    ) -> Result<Arc<Address>> {
        match cache {
            Some(cache) => cache.get_or_compute(&self.seed, key_index, &mut || {
                self.derive_address(key_index)
            }),
            None => self.derive_address(key_index).map(Arc::new),
        }
    }
}

/// The key-index domain is unbounded above but never below zero.
fn validate_start(start: KeyIndex) -> Result<()> {
    if start < 0 {
        return Err(Error::validation(format!(
            "start must be >= 0, got {start}"
        )));
    }
    Ok(())
}

impl<D> core::fmt::Debug for AddressGenerator<D>
where
    D: DigestSource + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AddressGenerator")
            .field("seed", &self.seed)
            .field("digest", &self.digest)
            .field("local_cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
