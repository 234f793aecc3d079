use std::{
    collections::{HashMap, hash_map::RandomState},
    hash::BuildHasher,
    sync::Arc,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Address, AddressCache, CacheKey, ComputeAddress, KeyIndex, Result, Seed,
    mutex::{Mutex, MutexGuard, lock},
};

/// Default number of shards used by [`MemoryAddressCache::new`].
pub const DEFAULT_SHARDS: usize = 16;

/// Per-key slot. Its lock is held for the whole computation of a missing
/// entry, which is what makes lookups single-flight.
type Slot = Mutex<Option<Arc<Address>>>;

/// Locks a slot. A slot only ever holds a finished entry or nothing, so a
/// panic in a computation cannot leave it half-written and poisoning is
/// cleared instead of reported.
fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<Arc<Address>>> {
    #[cfg(feature = "parking-lot")]
    {
        slot.lock()
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        slot.lock().unwrap_or_else(|poisoned| {
            slot.clear_poison();
            poisoned.into_inner()
        })
    }
}

type Shard = Mutex<HashMap<CacheKey, Arc<Slot>>>;

/// An in-memory, thread-safe [`AddressCache`] with single-flight lookups.
///
/// Entries are spread over a fixed number of shards. A shard lock is only held
/// long enough to find or create the slot for a key; the computation itself
/// runs under that key's own slot lock. As a result:
///
/// - concurrent [`get_or_compute`](AddressCache::get_or_compute) calls for the
///   same `(seed, key_index)` run the computation exactly once, and every
///   caller receives the same [`Arc<Address>`];
/// - callers for different keys never wait on each other's computations.
///
/// Entries are never evicted.
///
/// ## Features
/// - `parking-lot`: use non-poisoning `parking_lot` mutexes
/// - `cache-padded`: pad each shard to a cache line to avoid false sharing
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use addrgen::{Address, AddressCache, MemoryAddressCache, Seed};
///
/// let cache = MemoryAddressCache::new();
/// let seed = Seed::from("seed");
/// let address = Arc::new(Address::new([0; 32], Some(1)));
///
/// cache.set(&seed, 1, Arc::clone(&address)).unwrap();
/// let hit = cache.get(&seed, 1).unwrap().unwrap();
/// assert!(Arc::ptr_eq(&hit, &address));
/// assert!(cache.get(&seed, 2).unwrap().is_none());
/// ```
pub struct MemoryAddressCache {
    #[cfg(feature = "cache-padded")]
    shards: Box<[crossbeam_utils::CachePadded<Shard>]>,
    #[cfg(not(feature = "cache-padded"))]
    shards: Box<[Shard]>,
    hasher: RandomState,
}

impl MemoryAddressCache {
    /// Creates an empty cache with [`DEFAULT_SHARDS`] shards.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates an empty cache with `shards` shards (at least one).
    ///
    /// More shards reduce contention between unrelated keys when many threads
    /// miss at once.
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| {
                let shard = Mutex::new(HashMap::new());
                #[cfg(feature = "cache-padded")]
                {
                    crossbeam_utils::CachePadded::new(shard)
                }
                #[cfg(not(feature = "cache-padded"))]
                {
                    shard
                }
            })
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of stored addresses.
    ///
    /// # Errors
    /// - Returns an error if a lock has been poisoned.
    pub fn len(&self) -> Result<usize> {
        let mut count = 0;
        for shard in self.shards.iter() {
            let slots: Vec<Arc<Slot>> = lock!(shard).values().cloned().collect();
            for slot in slots {
                if lock_slot(&slot).is_some() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Returns `true` if no address has been stored yet.
    ///
    /// # Errors
    /// - Returns an error if a lock has been poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn shard(&self, key: &CacheKey) -> &Shard {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[index]
    }

    /// Returns the slot for `key`, creating an empty one if needed.
    fn slot(&self, key: CacheKey) -> Result<Arc<Slot>> {
        let mut shard = lock!(self.shard(&key));
        Ok(Arc::clone(
            shard.entry(key).or_insert_with(|| Arc::new(Mutex::new(None))),
        ))
    }

    fn existing_slot(&self, key: &CacheKey) -> Result<Option<Arc<Slot>>> {
        let shard = lock!(self.shard(key));
        Ok(shard.get(key).cloned())
    }

    /// Drops the empty slot for `key` unless another caller holds it.
    ///
    /// Slot handles are only handed out under the shard lock, so a strong
    /// count of two (map plus `slot`) means nobody is waiting on it.
    fn discard_empty_slot(&self, key: &CacheKey, slot: &Arc<Slot>) -> Result<()> {
        let mut shard = lock!(self.shard(key));
        let unused = Arc::strong_count(slot) == 2
            && shard.get(key).is_some_and(|current| Arc::ptr_eq(current, slot));
        if unused {
            shard.remove(key);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> Result<usize> {
        let mut count = 0;
        for shard in self.shards.iter() {
            count += lock!(shard).len();
        }
        Ok(count)
    }
}

impl Default for MemoryAddressCache {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MemoryAddressCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryAddressCache")
            .field("shards", &self.shards.len())
            .finish_non_exhaustive()
    }
}

impl AddressCache for MemoryAddressCache {
    fn get(&self, seed: &Seed, key_index: KeyIndex) -> Result<Option<Arc<Address>>> {
        let key = CacheKey::new(seed, key_index);
        let Some(slot) = self.existing_slot(&key)? else {
            return Ok(None);
        };
        let entry = lock_slot(&slot);
        Ok(entry.clone())
    }

    fn set(&self, seed: &Seed, key_index: KeyIndex, address: Arc<Address>) -> Result<()> {
        let slot = self.slot(CacheKey::new(seed, key_index))?;
        let mut entry = lock_slot(&slot);
        // First write wins; an entry never changes once stored.
        if entry.is_none() {
            *entry = Some(address);
        }
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, seed, compute))
    )]
    fn get_or_compute(
        &self,
        seed: &Seed,
        key_index: KeyIndex,
        compute: &mut ComputeAddress<'_>,
    ) -> Result<Arc<Address>> {
        let key = CacheKey::new(seed, key_index);
        let slot = self.slot(key)?;
        let mut entry = lock_slot(&slot);

        if let Some(hit) = entry.as_ref() {
            #[cfg(feature = "tracing")]
            tracing::trace!(key_index, "address cache hit");
            return Ok(Arc::clone(hit));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(key_index, "address cache miss, deriving");

        match compute() {
            Ok(address) => {
                let address = Arc::new(address);
                *entry = Some(Arc::clone(&address));
                Ok(address)
            }
            Err(err) => {
                // The slot stays empty and the next caller retries.
                self.discard_empty_slot(&key, &slot)?;
                Err(err)
            }
        }
    }
}
