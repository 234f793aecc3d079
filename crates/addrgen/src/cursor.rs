use crate::{Error, Result};

/// A position in the key-index space of a seed.
///
/// Key indices are signed: requests never *start* below zero, but a cursor
/// with a negative step will walk past zero if it keeps being advanced.
/// Stopping in time is the caller's job.
pub type KeyIndex = i64;

/// A forward-only cursor over key indices.
///
/// Each call to [`advance`](Self::advance) yields the current index and then
/// moves by `step`. The step is never zero.
///
/// A cursor belongs to exactly one derivation path and is never shared across
/// threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCursor {
    current: KeyIndex,
    step: i64,
}

impl KeyCursor {
    /// Creates a cursor positioned at `start`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if `step` is zero.
    pub fn new(start: KeyIndex, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::validation("step must not be zero"));
        }
        Ok(Self {
            current: start,
            step,
        })
    }

    /// Returns the current index, then moves the cursor by `step`.
    ///
    /// Saturates at the bounds of [`KeyIndex`] rather than wrapping.
    #[inline]
    pub fn advance(&mut self) -> KeyIndex {
        let index = self.current;
        self.current = self.current.saturating_add(self.step);
        index
    }

    /// The index the next call to [`advance`](Self::advance) will return.
    pub fn current(&self) -> KeyIndex {
        self.current
    }

    pub fn step(&self) -> i64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_returns_then_steps() {
        let mut cursor = KeyCursor::new(3, 2).unwrap();
        assert_eq!(cursor.advance(), 3);
        assert_eq!(cursor.advance(), 5);
        assert_eq!(cursor.current(), 7);
        assert_eq!(cursor.step(), 2);
    }

    #[test]
    fn negative_step_walks_below_zero() {
        let mut cursor = KeyCursor::new(1, -1).unwrap();
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), -1);
    }

    #[test]
    fn zero_step_rejected() {
        let err = KeyCursor::new(0, 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn saturates_at_max() {
        let mut cursor = KeyCursor::new(KeyIndex::MAX - 1, 5).unwrap();
        assert_eq!(cursor.advance(), KeyIndex::MAX - 1);
        assert_eq!(cursor.advance(), KeyIndex::MAX);
        assert_eq!(cursor.advance(), KeyIndex::MAX);
    }
}
