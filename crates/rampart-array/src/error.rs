// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for rampart-array.

use core::alloc::Layout;

use thiserror::Error;

/// Error type for every operation that requests a new block.
///
/// Element failures (`Default`, `Clone`) are panics and never show up here;
/// see the crate docs for how those unwind.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocationError {
    /// The byte size of `slots` elements does not fit in `isize::MAX`.
    #[error("Capacity overflow: {slots} slots exceed the addressable range")]
    CapacityOverflow {
        /// Requested slot count.
        slots: usize,
    },

    /// The global allocator returned null for the requested layout.
    #[error("Allocator refused a request for {} bytes", .layout.size())]
    Refused {
        /// Layout that could not be satisfied.
        layout: Layout,
    },
}

impl AllocationError {
    /// Escalates the error the way the standard collections do.
    ///
    /// Used by the infallible `Clone` impls, which cannot return a `Result`.
    #[cold]
    pub(crate) fn escalate(self) -> ! {
        match self {
            Self::CapacityOverflow { .. } => panic!("{}", self),
            Self::Refused { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}
