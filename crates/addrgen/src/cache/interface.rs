use std::sync::Arc;

use crate::{Address, KeyIndex, Result, Seed};

/// Identifies one cache entry: a seed fingerprint plus a key index.
///
/// The fingerprint is a one-way hash (see [`Seed::fingerprint`]), so a cache
/// never holds secret material of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    seed: [u8; 32],
    key_index: KeyIndex,
}

impl CacheKey {
    pub fn new(seed: &Seed, key_index: KeyIndex) -> Self {
        Self {
            seed: seed.fingerprint(),
            key_index,
        }
    }

    pub fn key_index(&self) -> KeyIndex {
        self.key_index
    }
}

/// Computation run by [`AddressCache::get_or_compute`] on a miss.
pub type ComputeAddress<'a> = dyn FnMut() -> Result<Address> + 'a;

/// A store of derived addresses keyed by `(seed, key_index)`.
///
/// Derivation is pure, so an entry never changes once written and never needs
/// invalidation. Implementations must be shareable across threads.
///
/// Only [`get`](Self::get) and [`set`](Self::set) are required. The provided
/// [`get_or_compute`](Self::get_or_compute) is a plain check-then-insert and
/// may compute the same entry more than once under contention; caches that
/// promise single-flight lookups, like [`MemoryAddressCache`], override it.
///
/// [`MemoryAddressCache`]: crate::MemoryAddressCache
pub trait AddressCache: Send + Sync {
    /// Returns the cached address, or `None` on a miss.
    fn get(&self, seed: &Seed, key_index: KeyIndex) -> Result<Option<Arc<Address>>>;

    /// Stores `address` for `(seed, key_index)`.
    fn set(&self, seed: &Seed, key_index: KeyIndex, address: Arc<Address>) -> Result<()>;

    /// Returns the cached address, running `compute` and storing its result
    /// on a miss.
    ///
    /// # Errors
    /// Propagates any error from `compute` unchanged; nothing is stored in
    /// that case.
    fn get_or_compute(
        &self,
        seed: &Seed,
        key_index: KeyIndex,
        compute: &mut ComputeAddress<'_>,
    ) -> Result<Arc<Address>> {
        if let Some(hit) = self.get(seed, key_index)? {
            return Ok(hit);
        }
        let address = Arc::new(compute()?);
        self.set(seed, key_index, Arc::clone(&address))?;
        Ok(address)
    }
}

impl<C: AddressCache + ?Sized> AddressCache for Arc<C> {
    fn get(&self, seed: &Seed, key_index: KeyIndex) -> Result<Option<Arc<Address>>> {
        (**self).get(seed, key_index)
    }

    fn set(&self, seed: &Seed, key_index: KeyIndex, address: Arc<Address>) -> Result<()> {
        (**self).set(seed, key_index, address)
    }

    fn get_or_compute(
        &self,
        seed: &Seed,
        key_index: KeyIndex,
        compute: &mut ComputeAddress<'_>,
    ) -> Result<Arc<Address>> {
        (**self).get_or_compute(seed, key_index, compute)
    }
}
