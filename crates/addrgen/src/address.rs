use core::{fmt, hash, str::FromStr};
use sha2::{Digest as _, Sha256};

use crate::{Digest, Error, KeyIndex};

/// Length in bytes of an [`Address`].
pub const ADDRESS_LEN: usize = 32;

/// A public address derived from a seed at one key index.
///
/// Addresses compare and hash by their bytes only. The key index is metadata
/// so an address can report which index produced it. An address parsed from a
/// string has no known index and reports `None`.
#[derive(Clone, Copy)]
pub struct Address {
    bytes: [u8; ADDRESS_LEN],
    key_index: Option<KeyIndex>,
}

impl Address {
    pub fn new(bytes: [u8; ADDRESS_LEN], key_index: Option<KeyIndex>) -> Self {
        Self { bytes, key_index }
    }

    /// Converts a key digest into its address with a single SHA-256 pass,
    /// keeping the digest's key index.
    ///
    /// # Example
    /// ```
    /// use addrgen::{Address, Digest, DIGEST_LEN};
    ///
    /// let digest = Digest::new([1; DIGEST_LEN], 9);
    /// let address = Address::from_digest(&digest);
    /// assert_eq!(address, Address::from_digest(&digest));
    /// assert_eq!(address.key_index(), Some(9));
    /// ```
    pub fn from_digest(digest: &Digest) -> Self {
        Self {
            bytes: Sha256::digest(digest.as_bytes()).into(),
            key_index: Some(digest.key_index()),
        }
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.bytes
    }

    /// The key index that produced this address, if known.
    pub fn key_index(&self) -> Option<KeyIndex> {
        self.key_index
    }

    /// Returns a copy tagged with `key_index`.
    pub fn with_key_index(self, key_index: KeyIndex) -> Self {
        Self {
            key_index: Some(key_index),
            ..self
        }
    }
}

/// Free-function form of [`Address::from_digest`].
pub fn address_from_digest(digest: &Digest) -> Address {
    Address::from_digest(digest)
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Address {}

impl hash::Hash for Address {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address")
            .field("bytes", &format_args!("{self}"))
            .field("key_index", &self.key_index)
            .finish()
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.as_bytes();
        if input.len() != ADDRESS_LEN * 2 {
            return Err(Error::InvalidAddress {
                reason: format!(
                    "expected {} hex characters, got {}",
                    ADDRESS_LEN * 2,
                    input.len()
                ),
            });
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(input, &mut bytes).map_err(|err| Error::InvalidAddress {
            reason: err.to_string(),
        })?;
        Ok(Self::new(bytes, None))
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
mod serde_impl {
    use super::Address;
    use core::{fmt, str::FromStr};
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct AddressVisitor;

            impl de::Visitor<'_> for AddressVisitor {
                type Value = Address;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a 64 character hex address")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Address, E> {
                    Address::from_str(v).map_err(E::custom)
                }
            }

            deserializer.deserialize_str(AddressVisitor)
        }
    }
}
