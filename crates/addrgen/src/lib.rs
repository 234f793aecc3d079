//! Deterministic address derivation from a secret seed.
//!
//! An [`AddressGenerator`] turns a [`Seed`] into an unbounded sequence of
//! public [`Address`] values, one per key index. Deriving an address is
//! expensive, so lookups go through an optional [`AddressCache`]: either one
//! installed process-wide through the [`CacheRegistry`], or one set directly on
//! a generator, which shadows the process-wide cache for that generator only.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use addrgen::{AddressGenerator, MemoryAddressCache, Seed};
//!
//! let mut generator = AddressGenerator::new(Seed::from(&b"correct horse battery staple"[..]));
//! generator.set_cache(Some(Arc::new(MemoryAddressCache::new())));
//!
//! let batch = generator.get_addresses(0, 3, 1).unwrap();
//! let lazy: Vec<_> = generator
//!     .create_iterator(0, 1)
//!     .unwrap()
//!     .take(3)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(batch, lazy);
//! assert_eq!(batch[2].key_index(), Some(2));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod address;
mod cache;
mod cursor;
mod digest;
mod error;
mod generator;
mod mutex;
mod seed;

pub use crate::address::*;
pub use crate::cache::*;
pub use crate::cursor::*;
pub use crate::digest::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::seed::*;
