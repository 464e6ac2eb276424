// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering::Relaxed};
use std::sync::Arc;

/// Fixed-capacity sequence of `i64` shared by every wave task of a round.
///
/// Cloning is cheap and yields another handle to the same storage. Slots use
/// relaxed atomics: within a round the written and mirror index sets never
/// overlap, and the pool barrier orders one round after the previous one.
#[derive(Clone)]
pub struct Sequence {
    slots: Arc<[AtomicI64]>,
}

impl Sequence {
    /// The sequence `1..=n`.
    pub fn ascending(n: usize) -> Self {
        (1..=n as i64).collect()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value at `index`, or `None` past the capacity.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.slots.get(index).map(|slot| slot.load(Relaxed))
    }

    /// Stores `slots[index] + slots[mirror]` into `slots[index]`.
    ///
    /// Overflow wraps. Callers guarantee both indices are in bounds.
    pub(crate) fn fold_mirror(&self, index: usize, mirror: usize) {
        let current = self.slots[index].load(Relaxed);
        let opposite = self.slots[mirror].load(Relaxed);
        self.slots[index].store(current.wrapping_add(opposite), Relaxed);
    }

    /// Copy of the full in-memory state, stale slots included.
    pub fn snapshot(&self) -> Vec<i64> {
        self.slots.iter().map(|slot| slot.load(Relaxed)).collect()
    }
}

impl From<Vec<i64>> for Sequence {
    fn from(values: Vec<i64>) -> Self {
        values.into_iter().collect()
    }
}

impl From<&[i64]> for Sequence {
    fn from(values: &[i64]) -> Self {
        values.iter().copied().collect()
    }
}

impl FromIterator<i64> for Sequence {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Sequence {
            slots: iter.into_iter().map(AtomicI64::new).collect(),
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot()).finish()
    }
}
