#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard};

/// Acquires `$lock`, converting poisoning into [`crate::Error::LockPoisoned`]
/// when std mutexes are in use.
macro_rules! lock {
    ($lock:expr) => {{
        #[cfg(feature = "parking-lot")]
        {
            $lock.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            $lock.lock()?
        }
    }};
}

pub(crate) use lock;
