// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::iter::FusedIterator;
use core::ptr;

use crate::raw_storage::RawStorage;

/// An owning iterator over the values of a [`DynArray`](crate::DynArray).
///
/// Takes over the array's block. Values not consumed are dropped together
/// with the iterator, then the block is released.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    /// `storage` must hold live values in `[0, len)` and nothing else.
    pub(crate) fn new(storage: RawStorage<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());

        Self {
            storage,
            front: 0,
            back: len,
        }
    }

    /// Number of values not yet yielded.
    #[inline]
    fn remaining(&self) -> usize {
        self.back - self.front
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        let index = self.front;
        self.front += 1;

        // SAFETY: slot index is live and leaves [front, back) before being read
        Some(unsafe { ptr::read(self.storage.slot(index)) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;

        // SAFETY: slot back is live and has just left [front, back)
        Some(unsafe { ptr::read(self.storage.slot(self.back)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let front = self.front;
        let remaining = self.remaining();
        self.front = self.back;

        // SAFETY: [front, front + remaining) were still live and are no longer tracked
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.storage.slot(front),
                remaining,
            ));
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}
