use core::fmt;
use sha2::{Digest as _, Sha256};
use zeroize::Zeroize;

/// Length in bytes of seeds produced by [`Seed::random`].
pub const RANDOM_SEED_LEN: usize = 32;

/// The secret from which every key and address of an identity is derived.
///
/// A seed is an opaque byte string of any length. It is immutable once
/// constructed, compares by value, and is wiped from memory on drop. `Debug`
/// never prints its contents and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    bytes: Vec<u8>,
}

impl Seed {
    /// Wraps raw seed bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Generates a fresh random seed of [`RANDOM_SEED_LEN`] bytes using the
    /// thread-local RNG.
    #[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
    #[cfg(feature = "rand")]
    pub fn random() -> Self {
        use rand::RngCore;

        let mut bytes = vec![0u8; RANDOM_SEED_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Raw seed material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A one-way SHA-256 fingerprint of the seed.
    ///
    /// Caches key their entries on this value so they never hold a copy of
    /// the secret itself.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"addrgen/seed-fingerprint");
        hasher.update(&self.bytes);
        hasher.finalize().into()
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for Seed {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Seed {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_material() {
        let seed = Seed::from("SUPERSECRETSEED");
        let rendered = format!("{seed:?}");
        assert!(!rendered.contains("SUPERSECRET"));
        assert!(rendered.contains("len: 15"));
    }

    #[test]
    fn fingerprint_is_stable_and_distinct() {
        let a = Seed::from("alpha");
        let b = Seed::from("bravo");
        assert_eq!(a.fingerprint(), Seed::from("alpha").fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn empty_seed_is_allowed() {
        let seed = Seed::from(&b""[..]);
        assert!(seed.is_empty());
        assert_eq!(seed.len(), 0);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_seeds_differ() {
        let a = Seed::random();
        let b = Seed::random();
        assert_eq!(a.len(), RANDOM_SEED_LEN);
        assert_ne!(a, b);
    }
}
