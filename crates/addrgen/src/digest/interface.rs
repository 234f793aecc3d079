use crate::{KeyIndex, Result, Seed};
use std::sync::Arc;

/// Length in bytes of a [`Digest`].
pub const DIGEST_LEN: usize = 64;

/// Key digest derived from a seed at one key index.
///
/// This is the intermediate value between the secret seed and its public
/// [`Address`](crate::Address). It remembers the key index that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: [u8; DIGEST_LEN],
    key_index: KeyIndex,
}

impl Digest {
    pub fn new(bytes: [u8; DIGEST_LEN], key_index: KeyIndex) -> Self {
        Self { bytes, key_index }
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.bytes
    }

    /// The key index this digest was derived at.
    pub fn key_index(&self) -> KeyIndex {
        self.key_index
    }
}

/// A source of key digests.
///
/// This abstraction lets generators run against the real hash-chain
/// derivation or a mocked source in tests.
///
/// Implementations must be:
/// - **deterministic**: the same `(seed, key_index)` always yields the same
///   digest;
/// - **side-effect free**: no I/O, no shared mutable state;
/// - expensive enough, relative to a map lookup, that caching pays off.
///
/// # Example
/// ```
/// use addrgen::{Digest, DigestSource, KeyIndex, Result, Seed, DIGEST_LEN};
///
/// struct FixedDigest;
/// impl DigestSource for FixedDigest {
///     fn digest(&self, _seed: &Seed, key_index: KeyIndex) -> Result<Digest> {
///         Ok(Digest::new([7; DIGEST_LEN], key_index))
///     }
/// }
///
/// let digest = FixedDigest.digest(&Seed::from("seed"), 4).unwrap();
/// assert_eq!(digest.key_index(), 4);
/// ```
pub trait DigestSource: Send + Sync {
    /// Derives the digest for `key_index` under `seed`.
    ///
    /// # Errors
    /// Returns [`Error::Derivation`](crate::Error::Derivation) if the seed
    /// cannot be used by this source.
    fn digest(&self, seed: &Seed, key_index: KeyIndex) -> Result<Digest>;
}

impl<D: DigestSource + ?Sized> DigestSource for &D {
    fn digest(&self, seed: &Seed, key_index: KeyIndex) -> Result<Digest> {
        (**self).digest(seed, key_index)
    }
}

impl<D: DigestSource + ?Sized> DigestSource for Arc<D> {
    fn digest(&self, seed: &Seed, key_index: KeyIndex) -> Result<Digest> {
        (**self).digest(seed, key_index)
    }
}
