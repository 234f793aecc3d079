use std::sync::Arc;

use crate::{Address, AddressGenerator, DigestSource, KeyCursor, KeyIndex, Result};

/// A lazy, infinite sequence of addresses created by
/// [`AddressGenerator::create_iterator`].
///
/// Strictly forward: each `next` resolves the address at the cursor and then
/// advances it. There is no terminal state, so `next` never returns `None`.
/// Pair it with adapters like `take` or `find` to decide when to stop.
///
/// The effective cache is looked up on every step, so installing or clearing
/// a cache mid-iteration takes effect from the next item on.
///
/// # Example
/// ```
/// use addrgen::{AddressGenerator, Seed};
///
/// let generator = AddressGenerator::new(Seed::from("TESTSEED"));
/// let mut iter = generator.create_iterator(1, 2).unwrap();
///
/// assert_eq!(iter.next().unwrap().unwrap().key_index(), Some(1));
/// assert_eq!(iter.next().unwrap().unwrap().key_index(), Some(3));
/// assert_eq!(iter.next_index(), 5);
/// ```
pub struct AddressIter<'a, D>
where
    D: DigestSource,
{
    generator: &'a AddressGenerator<D>,
    cursor: KeyCursor,
}

impl<'a, D> AddressIter<'a, D>
where
    D: DigestSource,
{
    pub(crate) fn new(generator: &'a AddressGenerator<D>, cursor: KeyCursor) -> Self {
        Self { generator, cursor }
    }

    /// The key index the next item will be derived at.
    pub fn next_index(&self) -> KeyIndex {
        self.cursor.current()
    }

    pub fn step(&self) -> i64 {
        self.cursor.step()
    }
}

impl<D> Iterator for AddressIter<'_, D>
where
    D: DigestSource,
{
    type Item = Result<Arc<Address>>;

    fn next(&mut self) -> Option<Self::Item> {
        let key_index = self.cursor.advance();
        Some(self.generator.address_at(key_index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<D> core::fmt::Debug for AddressIter<'_, D>
where
    D: DigestSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AddressIter")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<D> core::iter::FusedIterator for AddressIter<'_, D> where D: DigestSource {}
