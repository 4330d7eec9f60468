// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;

use alloc::alloc::{alloc, dealloc};

use crate::error::AllocationError;

/// An owned, untyped block with room for `capacity` values of `T`.
///
/// `RawStorage` knows nothing about which slots hold live values. Whoever owns
/// it is responsible for constructing values into slots and destroying them
/// again before the storage is released. Dropping a `RawStorage` frees the
/// block and never runs a destructor of `T`.
///
/// The type is move-only: there is no `Clone`, because duplicating memory
/// without duplicating the values in it is meaningless.
///
/// # Example
///
/// ```rust
/// use rampart_array::{AllocationError, RawStorage};
///
/// fn example() -> Result<(), AllocationError> {
///     let mut a = RawStorage::<u64>::allocate(8)?;
///     let mut b = RawStorage::<u64>::new();
///
///     a.swap(&mut b);
///
///     assert_eq!(a.capacity(), 0);
///     assert_eq!(b.capacity(), 8);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawStorage uniquely owns its block, like Box<[MaybeUninit<T>]>.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: shared access only hands out *const T.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    /// Creates an empty storage. No allocation is performed.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a block for exactly `capacity` slots.
    ///
    /// No value is constructed. `capacity == 0` returns the empty storage, and
    /// zero-sized `T` never touches the allocator.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::CapacityOverflow`] if `capacity * size_of::<T>()`
    ///   exceeds `isize::MAX`.
    /// - [`AllocationError::Refused`] if the global allocator returns null.
    pub fn allocate(capacity: usize) -> Result<Self, AllocationError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Self::layout_for(capacity)?;

        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(AllocationError::Refused { layout })?;

        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Layout of a block with room for `capacity` values of `T`.
    pub(crate) fn layout_for(capacity: usize) -> Result<Layout, AllocationError> {
        Layout::array::<T>(capacity).map_err(|_| AllocationError::CapacityOverflow {
            slots: capacity,
        })
    }

    /// Releases the block.
    ///
    /// Equivalent to dropping the storage; spelled out for call sites that
    /// want the release to be visible. Values still living in the block are
    /// leaked, never dropped.
    pub fn deallocate(self) {
        drop(self);
    }

    /// Exchanges blocks and capacities with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.ptr, &mut other.ptr);
        core::mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves the block out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Number of slots in the block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if a block is currently owned.
    ///
    /// Always `false` for zero-sized `T`.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && core::mem::size_of::<T>() != 0
    }

    /// Pointer to the first slot. Dangling when no block is owned.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot. Dangling when no block is owned.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index <= capacity`.
    #[inline(always)]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity, "RawStorage::slot: index out of block");
        // SAFETY (PRECONDITIONS ARE MET): index stays within (or one past) the block
        unsafe { self.ptr.as_ptr().add(index) }
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }

        // Cannot fail: the same layout was accepted by allocate().
        if let Ok(layout) = Self::layout_for(self.capacity) {
            // SAFETY: ptr was returned by alloc() with this exact layout.
            unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T> core::fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawStorage")
            .field("capacity", &self.capacity)
            .field("allocated", &self.is_allocated())
            .finish_non_exhaustive()
    }
}
