use std::sync::{Arc, LazyLock};

use crate::{
    AddressCache, Result,
    mutex::{Mutex, lock},
};

/// The process-wide registry consulted by generators that have no cache of
/// their own.
static GLOBAL_REGISTRY: LazyLock<Arc<CacheRegistry>> =
    LazyLock::new(|| Arc::new(CacheRegistry::new()));

/// An installation point for a shared [`AddressCache`].
///
/// A registry starts empty, which disables caching for every generator that
/// reads from it. The application installs a cache explicitly and may clear
/// it again at any time; generators pick up the change on their next lookup.
///
/// [`CacheRegistry::global`] is the registry every
/// [`AddressGenerator`](crate::AddressGenerator) uses unless it was built
/// with [`with_registry`](crate::AddressGenerator::with_registry).
#[derive(Default)]
pub struct CacheRegistry {
    installed: Mutex<Option<Arc<dyn AddressCache>>>,
}

impl CacheRegistry {
    /// Creates an empty registry, independent of the process-wide one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Arc<CacheRegistry> {
        &GLOBAL_REGISTRY
    }

    /// Installs `cache`, returning the previously installed one.
    ///
    /// # Errors
    /// - Returns an error if the registry lock has been poisoned.
    pub fn install(
        &self,
        cache: Arc<dyn AddressCache>,
    ) -> Result<Option<Arc<dyn AddressCache>>> {
        let mut installed = lock!(self.installed);
        #[cfg(feature = "tracing")]
        tracing::debug!(replaced = installed.is_some(), "installing address cache");
        Ok(installed.replace(cache))
    }

    /// Removes the installed cache, disabling caching for every generator
    /// reading from this registry.
    ///
    /// # Errors
    /// - Returns an error if the registry lock has been poisoned.
    pub fn clear(&self) -> Result<Option<Arc<dyn AddressCache>>> {
        let mut installed = lock!(self.installed);
        #[cfg(feature = "tracing")]
        tracing::debug!(was_installed = installed.is_some(), "clearing address cache");
        Ok(installed.take())
    }

    /// The currently installed cache, if any.
    ///
    /// # Errors
    /// - Returns an error if the registry lock has been poisoned.
    pub fn current(&self) -> Result<Option<Arc<dyn AddressCache>>> {
        let installed = lock!(self.installed);
        Ok(installed.clone())
    }
}

impl core::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheRegistry").finish_non_exhaustive()
    }
}

/// Installs `cache` in the process-wide registry.
///
/// Shorthand for `CacheRegistry::global().install(cache)`.
pub fn install_global_cache(
    cache: Arc<dyn AddressCache>,
) -> Result<Option<Arc<dyn AddressCache>>> {
    CacheRegistry::global().install(cache)
}

/// Clears the process-wide registry.
///
/// Shorthand for `CacheRegistry::global().clear()`.
pub fn clear_global_cache() -> Result<Option<Arc<dyn AddressCache>>> {
    CacheRegistry::global().clear()
}
