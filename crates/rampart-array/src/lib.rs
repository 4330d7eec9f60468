// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Growable array with explicit raw storage and rollback on partial construction.
//!
//! The crate is split in two layers:
//!
//! - [`RawStorage<T>`]: an owned block with room for a fixed number of `T`
//!   slots. It allocates, releases and swaps. It never constructs or drops a
//!   value.
//! - [`DynArray<T>`]: owns one `RawStorage` plus the count of live values, and
//!   does every construct/drop itself.
//!
//! # Core Guarantees
//!
//! - **Typed allocation failures**: every operation that needs a new block
//!   returns [`AllocationError`] instead of aborting, and leaves the array as
//!   it was.
//! - **No leaks, no double drops on panic**: if `T::default()` or `T::clone()`
//!   panics halfway through a bulk operation, the values built by that
//!   operation are dropped last-to-first before the panic continues.
//! - **Strong copy**: [`DynArray::try_clone`] and the growing path of
//!   [`DynArray::try_clone_from`] either complete or change nothing.
//! - **Amortized growth**: [`DynArray::push_back`] doubles the capacity
//!   (0 → 1 → 2 → 4 ...). Capacity never shrinks on its own.
//! - **Checkable invalidation**: [`Position`]s carry the generation of the
//!   block they were taken from, so stale positions resolve to `None`.
//!
//! # Example: Basic Usage
//!
//! ```rust
//! use rampart_array::{AllocationError, DynArray};
//!
//! fn example() -> Result<(), AllocationError> {
//!     let mut a = DynArray::new();
//!     a.push_back(1)?;
//!     a.push_back(2)?;
//!     a.push_back(3)?;
//!
//!     let mut c = a.try_clone()?;
//!     c[0] = 99;
//!
//!     assert_eq!(a[0], 1);
//!     assert_eq!(c[0], 99);
//!
//!     let d = a.take();
//!     assert_eq!(a.len(), 0);
//!     assert_eq!(a.capacity(), 0);
//!     assert_eq!(d.as_slice(), &[1, 2, 3]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Example: Positions
//!
//! ```rust
//! use rampart_array::{AllocationError, DynArray};
//!
//! fn example() -> Result<(), AllocationError> {
//!     let mut array = DynArray::new();
//!     array.reserve(4)?;
//!     array.push_back(10)?;
//!
//!     let first = array.begin();
//!     assert_eq!(array.at(first), Some(&10));
//!
//!     // Reallocation invalidates every position
//!     array.reserve(10)?;
//!     assert_eq!(array.at(first), None);
//!     assert_eq!(array.at(array.begin()), Some(&10));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Test Utilities
//!
//! Enable the `test_utils` feature to inject allocation failures:
//!
//! ```toml
//! [dev-dependencies]
//! rampart-array = { version = "*", features = ["test_utils"] }
//! ```
//!
//! Then use [`DynArrayBehaviour`] to test error scenarios.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod dyn_array;
mod error;
mod fill;
mod into_iter;
mod position;
mod raw_storage;

#[cfg(test)]
mod tests;

pub use dyn_array::DynArray;
pub use error::AllocationError;
pub use into_iter::IntoIter;
pub use position::Position;
pub use raw_storage::RawStorage;

#[cfg(any(test, feature = "test_utils"))]
pub use dyn_array::DynArrayBehaviour;
