// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use crate::error::AllocationError;
use crate::fill::PartialFill;
use crate::into_iter::IntoIter;
use crate::position::Position;
use crate::raw_storage::RawStorage;

/// Test behaviour for injecting failures in `DynArray` operations.
///
/// This is only available with the `test_utils` feature and allows users
/// to test error handling paths in their code by injecting failures.
///
/// The behaviour is sticky - once set, it remains active until changed.
///
/// # Example
///
/// ```rust
/// // test_utils feature required in dev-dependencies
/// #[cfg(test)]
/// mod tests {
///     use rampart_array::{AllocationError, DynArray, DynArrayBehaviour};
///
///     #[test]
///     fn test_handles_refused_allocation() {
///         let mut array = DynArray::<u8>::new();
///         array.change_behaviour(DynArrayBehaviour::FailAtAllocate);
///
///         assert!(matches!(
///             array.push_back(1),
///             Err(AllocationError::Refused { .. })
///         ));
///
///         array.change_behaviour(DynArrayBehaviour::None);
///         assert!(array.push_back(1).is_ok());
///     }
/// }
/// ```
#[cfg(any(test, feature = "test_utils"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynArrayBehaviour {
    /// Normal behaviour - no injected failures.
    None,
    /// Every request for a new block fails with `AllocationError::Refused`.
    FailAtAllocate,
}

#[cfg(any(test, feature = "test_utils"))]
impl Default for DynArrayBehaviour {
    fn default() -> Self {
        Self::None
    }
}

/// A growable array built on an explicitly owned [`RawStorage`].
///
/// Slots `[0, len)` of the storage hold live values, slots
/// `[len, capacity)` hold nothing. Every allocating operation returns
/// `Result<_, AllocationError>` and leaves the array untouched on error.
///
/// Panics raised by `T::default()` or `T::clone()` during bulk construction
/// unwind through a guard that destroys the values built so far:
///
/// - [`sized`](Self::sized), [`try_clone`](Self::try_clone) and the growing
///   path of [`try_clone_from`](Self::try_clone_from) never expose a partial
///   result.
/// - The in-place path of `try_clone_from` assigns the common prefix with
///   `T::clone_from` and does not roll that prefix back.
/// - A growing [`resize`](Self::resize) keeps `len` at its previous value;
///   the capacity may already have grown.
///
/// # Example
///
/// ```rust
/// use rampart_array::{AllocationError, DynArray};
///
/// fn example() -> Result<(), AllocationError> {
///     let mut array = DynArray::new();
///     array.push_back(1u32)?;
///     array.push_back(2)?;
///     array.push_back(3)?;
///
///     assert_eq!(array.len(), 3);
///     assert_eq!(array.capacity(), 4);
///     assert_eq!(array.as_slice(), &[1, 2, 3]);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct DynArray<T> {
    storage: RawStorage<T>,
    len: usize,
    generation: u64,
    #[cfg(any(test, feature = "test_utils"))]
    behaviour: DynArrayBehaviour,
}

impl<T> DynArray<T> {
    /// Creates an empty array. No allocation is performed until the first
    /// operation that needs a slot.
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new(),
            len: 0,
            generation: 0,
            #[cfg(any(test, feature = "test_utils"))]
            behaviour: DynArrayBehaviour::None,
        }
    }

    fn from_parts(storage: RawStorage<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());

        Self {
            storage,
            len,
            generation: 0,
            #[cfg(any(test, feature = "test_utils"))]
            behaviour: DynArrayBehaviour::None,
        }
    }

    /// Creates an empty array owning a block of exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from [`RawStorage::allocate`].
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocationError> {
        Ok(Self::from_parts(RawStorage::allocate(capacity)?, 0))
    }

    /// Creates an array of `len` default values in a block of exactly `len`
    /// slots.
    ///
    /// If `T::default()` panics, the values built so far are dropped in
    /// reverse order and the block is released before the panic continues.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from [`RawStorage::allocate`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rampart_array::{AllocationError, DynArray};
    ///
    /// fn example() -> Result<(), AllocationError> {
    ///     let array = DynArray::<i32>::sized(5)?;
    ///
    ///     assert_eq!(array.len(), 5);
    ///     assert!(array.iter().all(|v| *v == 0));
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn sized(len: usize) -> Result<Self, AllocationError>
    where
        T: Default,
    {
        let storage = RawStorage::allocate(len)?;

        // SAFETY (PRECONDITIONS ARE MET): fresh block with exactly len vacant slots
        let len = unsafe { PartialFill::new(&storage, 0).fill(len, |_| T::default()) };

        Ok(Self::from_parts(storage, len))
    }

    /// Creates an array holding clones of `src`, in a block of exactly
    /// `src.len()` slots.
    ///
    /// Rolls back like [`sized`](Self::sized) if a clone panics.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from [`RawStorage::allocate`].
    pub fn try_from_slice(src: &[T]) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        Ok(Self::cloned_into(RawStorage::allocate(src.len())?, src))
    }

    fn cloned_into(storage: RawStorage<T>, src: &[T]) -> Self
    where
        T: Clone,
    {
        debug_assert!(storage.capacity() >= src.len());

        // SAFETY (PRECONDITIONS ARE MET): fresh block with at least src.len() vacant slots
        let len = unsafe { PartialFill::new(&storage, 0).fill(src.len(), |i| src[i].clone()) };

        Self::from_parts(storage, len)
    }

    /// Copy construction: clones every element into a block of exactly
    /// `self.len()` slots.
    ///
    /// `self` is never modified. If a clone panics, the partial copy is
    /// destroyed and its block released.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`]; `self` is unchanged.
    pub fn try_clone(&self) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        Ok(Self::cloned_into(self.allocate(self.len)?, self.as_slice()))
    }

    /// Copy assignment: makes `self` an element-wise copy of `source`.
    ///
    /// - If `source.len() > self.capacity()`, a complete copy is built first
    ///   and swapped in. On any failure `self` is untouched.
    /// - Otherwise the current block is reused. The common prefix is assigned
    ///   with `T::clone_from` (a panic there leaves old and new values mixed),
    ///   missing elements are cloned into the tail (a panic there drops the
    ///   partial tail and keeps the previous `len`), and surplus elements are
    ///   dropped.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from the growing path; `self` is
    /// unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocationError>
    where
        T: Clone,
    {
        if source.len > self.capacity() {
            let mut copy = Self::cloned_into(self.allocate(source.len)?, source.as_slice());
            self.swap(&mut copy);
            return Ok(());
        }

        let common = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..common]
            .iter_mut()
            .zip(&source.as_slice()[..common])
        {
            dst.clone_from(src);
        }

        if source.len > self.len {
            let start = self.len;
            let tail = &source.as_slice()[start..];

            // SAFETY (PRECONDITIONS ARE MET): source.len <= capacity, slots [len, source.len) are vacant
            let added =
                unsafe { PartialFill::new(&self.storage, start).fill(tail.len(), |i| tail[i].clone()) };
            self.len += added;
        } else {
            self.truncate(source.len);
        }

        debug_assert_eq!(self.len, source.len);

        Ok(())
    }

    /// Move construction: returns the contents of `self`, leaving `self`
    /// empty with no block.
    ///
    /// The block travels with the values; nothing is reallocated.
    #[must_use = "dropping the result destroys the taken values"]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        self.swap(&mut taken);
        taken
    }

    /// Move assignment: drops the current contents of `self` and takes over
    /// the contents and block of `source`, which is left empty with no block.
    pub fn take_from(&mut self, source: &mut Self) {
        let mut previous = source.take();
        self.swap(&mut previous);
    }

    /// Exchanges contents and blocks with `other`.
    ///
    /// Positions previously taken from either array stop resolving.
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        core::mem::swap(&mut self.len, &mut other.len);
        self.bump_generation();
        other.bump_generation();
    }

    /// Grows the block to exactly `capacity` slots.
    ///
    /// Does nothing if `capacity <= self.capacity()`. Otherwise the live values
    /// are moved bitwise into a new block and the old block is released.
    /// Moves cannot fail, so either the new block is adopted with every value
    /// in it or nothing changes. All positions are invalidated.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`]; `self` is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rampart_array::{AllocationError, DynArray};
    ///
    /// fn example() -> Result<(), AllocationError> {
    ///     let mut array = DynArray::<u8>::new();
    ///     array.reserve(10)?;
    ///     assert_eq!(array.capacity(), 10);
    ///
    ///     // Smaller requests are no-ops
    ///     array.reserve(4)?;
    ///     assert_eq!(array.capacity(), 10);
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn reserve(&mut self, capacity: usize) -> Result<(), AllocationError> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        let mut storage = self.allocate(capacity)?;

        // SAFETY: both blocks hold at least len slots and are distinct allocations.
        // After the copy the old slots are treated as vacant; the values live on in `storage`.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), storage.as_mut_ptr(), self.len);
        }

        self.storage.swap(&mut storage);
        self.bump_generation();

        // The old block is released here; it holds no live values anymore.
        storage.deallocate();

        Ok(())
    }

    /// Sets the length to `len`.
    ///
    /// Calls [`reserve`](Self::reserve) with `len`, then default-constructs
    /// the slots `[self.len(), len)` or drops the values `[len, self.len())`.
    ///
    /// If `T::default()` panics, the values added by this call are dropped
    /// and `len` keeps its previous value.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from `reserve`; `self` is unchanged.
    pub fn resize(&mut self, len: usize) -> Result<(), AllocationError>
    where
        T: Default,
    {
        self.reserve(len)?;

        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }

        let start = self.len;

        // SAFETY (PRECONDITIONS ARE MET): reserve() guarantees len <= capacity, slots [start, len) are vacant
        let added = unsafe { PartialFill::new(&self.storage, start).fill(len - start, |_| T::default()) };
        self.len += added;

        Ok(())
    }

    /// Drops the values `[len, self.len())`. Does nothing if `len >= self.len()`.
    ///
    /// Capacity is retained.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        // SAFETY (PRECONDITIONS ARE MET): len < self.len <= capacity
        let tail = ptr::slice_from_raw_parts_mut(unsafe { self.storage.slot(len) }, self.len - len);

        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;

        // SAFETY: the tail held live values and is no longer counted by len
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drops every value. Capacity is retained.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends `value`.
    ///
    /// When the array is full the capacity grows to 1 from 0, and doubles
    /// otherwise, which keeps a sequence of appends amortized O(1).
    ///
    /// # Errors
    ///
    /// Propagates [`AllocationError`] from growth. `value` is dropped and the
    /// array is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocationError> {
        if self.len == self.capacity() {
            self.reserve(self.grown_capacity()?)?;
        }

        // SAFETY (PRECONDITIONS ARE MET): len < capacity, slot len is vacant
        unsafe { ptr::write(self.storage.slot(self.len), value) };
        self.len += 1;

        Ok(())
    }

    fn grown_capacity(&self) -> Result<usize, AllocationError> {
        match self.capacity() {
            0 => Ok(1),
            capacity => capacity
                .checked_mul(2)
                .ok_or(AllocationError::CapacityOverflow { slots: capacity }),
        }
    }

    /// Removes the last value and returns it, or `None` if the array is empty.
    ///
    /// Capacity is retained.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;

        // SAFETY: slot len held a live value that is no longer counted
        Some(unsafe { ptr::read(self.storage.slot(self.len)) })
    }

    /// Returns the number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the current block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns a slice over the live values.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live; the pointer is non-null and aligned even without a block
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// Returns a mutable slice over the live values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots [0, len) are live and uniquely borrowed through &mut self
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Returns a reference to the value at `index` without bounds checking.
    ///
    /// Prefer indexing (`array[i]`) or `get`, which are checked.
    ///
    /// # Safety
    ///
    /// `index < self.len()`. Anything else is undefined behavior.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "DynArray::get_unchecked: index out of range");
        // SAFETY (PRECONDITIONS ARE MET): caller guarantees index < len
        unsafe { &*self.storage.slot(index) }
    }

    /// Returns a mutable reference to the value at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index < self.len()`. Anything else is undefined behavior.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "DynArray::get_unchecked_mut: index out of range");
        // SAFETY (PRECONDITIONS ARE MET): caller guarantees index < len
        unsafe { &mut *self.storage.slot(index) }
    }

    /// Position of the first value.
    #[inline]
    pub fn begin(&self) -> Position {
        Position::new(0, self.generation)
    }

    /// Position one past the last value.
    #[inline]
    pub fn end(&self) -> Position {
        Position::new(self.len, self.generation)
    }

    /// Returns `true` if `position` was taken from the current block and
    /// refers to a live value.
    #[inline]
    pub fn is_valid(&self, position: &Position) -> bool {
        position.generation() == self.generation && position.index() < self.len
    }

    /// Resolves `position`, or `None` if it has been invalidated.
    pub fn at(&self, position: Position) -> Option<&T> {
        if !self.is_valid(&position) {
            return None;
        }

        self.as_slice().get(position.index())
    }

    /// Resolves `position` mutably, or `None` if it has been invalidated.
    pub fn at_mut(&mut self, position: Position) -> Option<&mut T> {
        if !self.is_valid(&position) {
            return None;
        }

        self.as_mut_slice().get_mut(position.index())
    }

    /// Iterates over the live values.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterates mutably over the live values.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Changes the test behaviour for this array.
    ///
    /// This is only available with the `test_utils` feature and allows injecting
    /// failures for testing error handling paths.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn change_behaviour(&mut self, behaviour: DynArrayBehaviour) {
        self.behaviour = behaviour;
    }

    fn allocate(&self, capacity: usize) -> Result<RawStorage<T>, AllocationError> {
        #[cfg(any(test, feature = "test_utils"))]
        if matches!(self.behaviour, DynArrayBehaviour::FailAtAllocate) {
            return Err(AllocationError::Refused {
                layout: RawStorage::<T>::layout_for(capacity)?,
            });
        }

        RawStorage::allocate(capacity)
    }

    #[inline]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, len) are live; the storage releases the block afterwards
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) };
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| e.escalate())
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.try_clone_from(source) {
            e.escalate();
        }
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: core::fmt::Debug> core::fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = self.len;
        self.len = 0;

        IntoIter::new(self.storage.take(), len)
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
