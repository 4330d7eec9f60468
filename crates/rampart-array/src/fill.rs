// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Placement construction of a run of slots, with rollback on panic.

use core::mem;
use core::ptr;

use crate::raw_storage::RawStorage;

/// Values written into `[start, start + filled)` that no array counts yet.
///
/// If construction of the next value panics, dropping the guard destroys the
/// values already written, last to first. The block itself stays with its
/// owner. [`commit`](Self::commit) hands the values over instead.
pub(crate) struct PartialFill<'a, T> {
    storage: &'a RawStorage<T>,
    start: usize,
    filled: usize,
}

impl<'a, T> PartialFill<'a, T> {
    pub(crate) fn new(storage: &'a RawStorage<T>, start: usize) -> Self {
        Self {
            storage,
            start,
            filled: 0,
        }
    }

    /// Constructs `count` values produced by `make(i)` into consecutive slots
    /// and returns `count`.
    ///
    /// # Safety
    ///
    /// Slots `[start, start + count)` must lie inside the block and be vacant.
    pub(crate) unsafe fn fill<F>(mut self, count: usize, mut make: F) -> usize
    where
        F: FnMut(usize) -> T,
    {
        debug_assert!(
            self.start + count <= self.storage.capacity(),
            "PartialFill::fill: run exceeds block"
        );

        for i in 0..count {
            let value = make(i);
            // SAFETY (PRECONDITIONS ARE MET): slot start + i is inside the block and vacant
            unsafe { ptr::write(self.storage.slot(self.start + i), value) };
            self.filled += 1;
        }

        self.commit()
    }

    fn commit(self) -> usize {
        let filled = self.filled;
        mem::forget(self);
        filled
    }
}

impl<T> Drop for PartialFill<'_, T> {
    fn drop(&mut self) {
        for index in (self.start..self.start + self.filled).rev() {
            // SAFETY: every slot in the run was written by fill() and not handed over
            unsafe { ptr::drop_in_place(self.storage.slot(index)) };
        }
    }
}
