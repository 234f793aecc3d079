/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `addrgen` can produce.
///
/// Validation failures are raised before any cache or derivation work starts,
/// so a rejected request never leaves anything behind in a cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An argument was outside its domain (`start < 0`, `count < 1`,
    /// `step == 0`, or an unsupported security level).
    ///
    /// Always recoverable by retrying with corrected arguments.
    #[error("invalid argument: {reason}")]
    Validation {
        /// Which argument was rejected and why.
        reason: String,
    },

    /// The digest primitive could not derive key material for the request.
    ///
    /// Propagated unchanged to the caller; fatal to the current request only.
    #[error("derivation failed: {reason}")]
    Derivation {
        /// Description supplied by the digest source.
        reason: String,
    },

    /// A string could not be parsed as an [`Address`](crate::Address).
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// What was wrong with the input.
        reason: String,
    },

    /// A cache lock was poisoned by a thread that panicked while holding it.
    ///
    /// Only produced with std mutexes; the `parking-lot` feature swaps in
    /// mutexes that never poison.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("cache lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn derivation(reason: impl Into<String>) -> Self {
        Self::Derivation {
            reason: reason.into(),
        }
    }

    /// Returns `true` for argument validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
