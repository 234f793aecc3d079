use sha2::{Digest as _, Sha256, Sha512};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DIGEST_LEN, Digest, DigestSource, Error, KeyIndex, Result, Seed};

/// Number of key fragments per security level.
pub const FRAGMENTS_PER_LEVEL: usize = 27;

/// Number of hash applications that turn a private key fragment into the end
/// of its public chain.
pub const CHAIN_LENGTH: usize = 26;

/// Lowest supported security level.
pub const MIN_SECURITY_LEVEL: u8 = 1;

/// Highest supported security level.
pub const MAX_SECURITY_LEVEL: u8 = 3;

/// Security level used by [`HashChainDigest::default`].
pub const DEFAULT_SECURITY_LEVEL: u8 = 2;

const SUBSEED_DOMAIN: &[u8] = b"addrgen/subseed";

/// The default [`DigestSource`]: a one-time-signature style hash chain.
///
/// For a given `(seed, key_index)`:
///
/// 1. A subseed is drawn from `SHA-256(domain || seed || key_index)`.
/// 2. The subseed is expanded into `security_level * 27` private key
///    fragments.
/// 3. Every fragment is hashed 26 more times, giving the public end of its
///    chain.
/// 4. The chain ends are compressed with SHA-512 into the 64-byte digest.
///
/// Roughly `security_level * 27 * 27` SHA-256 invocations per digest, which is
/// what makes caching worthwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashChainDigest {
    security_level: u8,
}

impl HashChainDigest {
    /// Creates a digest source for the given security level.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] unless `security_level` is within
    /// [`MIN_SECURITY_LEVEL`]`..=`[`MAX_SECURITY_LEVEL`].
    pub fn new(security_level: u8) -> Result<Self> {
        if !(MIN_SECURITY_LEVEL..=MAX_SECURITY_LEVEL).contains(&security_level) {
            return Err(Error::validation(format!(
                "security level must be between {MIN_SECURITY_LEVEL} and {MAX_SECURITY_LEVEL}, got {security_level}"
            )));
        }
        Ok(Self { security_level })
    }

    pub fn security_level(&self) -> u8 {
        self.security_level
    }

    fn subseed(seed: &Seed, key_index: KeyIndex) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(SUBSEED_DOMAIN);
        hasher.update(seed.as_bytes());
        hasher.update(key_index.to_be_bytes());
        hasher.finalize().into()
    }

    fn chain_end(subseed: &[u8; 32], fragment: u32) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(subseed);
        hasher.update(fragment.to_be_bytes());
        let mut link: [u8; 32] = hasher.finalize().into();

        for _ in 0..CHAIN_LENGTH {
            link = Sha256::digest(link).into();
        }
        link
    }
}

impl Default for HashChainDigest {
    fn default() -> Self {
        Self {
            security_level: DEFAULT_SECURITY_LEVEL,
        }
    }
}

impl DigestSource for HashChainDigest {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, seed)))]
    fn digest(&self, seed: &Seed, key_index: KeyIndex) -> Result<Digest> {
        if seed.is_empty() {
            return Err(Error::derivation("seed is empty"));
        }

        let mut subseed = Self::subseed(seed, key_index);
        let fragments = usize::from(self.security_level) * FRAGMENTS_PER_LEVEL;

        let mut compressor = Sha512::new();
        for fragment in 0..fragments {
            compressor.update(Self::chain_end(&subseed, fragment as u32));
        }
        subseed.fill(0);

        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&compressor.finalize());
        Ok(Digest::new(bytes, key_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let source = HashChainDigest::default();
        let seed = Seed::from("TESTSEED");
        let a = source.digest(&seed, 5).unwrap();
        let b = source.digest(&seed, 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key_index(), 5);
    }

    #[test]
    fn index_and_seed_change_digest() {
        let source = HashChainDigest::default();
        let seed = Seed::from("TESTSEED");
        let base = source.digest(&seed, 0).unwrap();
        assert_ne!(base, source.digest(&seed, 1).unwrap());
        assert_ne!(
            base.as_bytes(),
            source.digest(&Seed::from("OTHERSEED"), 0).unwrap().as_bytes()
        );
    }

    #[test]
    fn security_level_changes_digest() {
        let seed = Seed::from("TESTSEED");
        let low = HashChainDigest::new(1).unwrap().digest(&seed, 0).unwrap();
        let high = HashChainDigest::new(3).unwrap().digest(&seed, 0).unwrap();
        assert_ne!(low, high);
    }

    #[test]
    fn security_level_bounds() {
        assert!(HashChainDigest::new(0).unwrap_err().is_validation());
        assert!(HashChainDigest::new(4).unwrap_err().is_validation());
        assert_eq!(HashChainDigest::new(3).unwrap().security_level(), 3);
    }

    #[test]
    fn empty_seed_is_a_derivation_error() {
        let err = HashChainDigest::default()
            .digest(&Seed::from(""), 0)
            .unwrap_err();
        assert!(matches!(err, Error::Derivation { .. }));
    }
}
