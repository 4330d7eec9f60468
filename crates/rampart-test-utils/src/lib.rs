// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for Rampart crates.
//!
//! [`Tracked`] is an element type that records every construction, clone,
//! assignment and drop in a per-thread ledger, and can be told to panic on
//! the n-th default construction, clone or assignment. Containers are
//! exercised with it to prove that nothing leaks and nothing is dropped
//! twice when element operations fail halfway.
//!
//! ## License
//!
//! GPL-3.0-only

mod lifecycle;

#[cfg(test)]
mod tests;

pub use lifecycle::{Lifecycle, LifecycleCounts, Tracked};
