// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// A cursor into a [`DynArray`](crate::DynArray).
///
/// Positions are plain indices tagged with the generation of the block they
/// were taken from. Any operation that makes the array adopt a different
/// block (`reserve`, a growing `resize`/`push_back`/`try_clone_from`, `swap`,
/// `take`, `take_from`) bumps the generation, after which every older
/// position stops resolving in [`DynArray::at`](crate::DynArray::at).
///
/// Positions only compare meaningfully against positions of the same array.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    index: usize,
    generation: u64,
}

impl Position {
    #[inline]
    pub(crate) const fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Slot index this position refers to.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    /// The position one slot further.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            index: self.index + 1,
            generation: self.generation,
        }
    }

    /// Number of slots from `self` to `end`, or `None` if `end` lies before
    /// `self` or belongs to another generation.
    pub fn distance_to(&self, end: &Position) -> Option<usize> {
        if self.generation != end.generation {
            return None;
        }

        end.index.checked_sub(self.index)
    }
}
