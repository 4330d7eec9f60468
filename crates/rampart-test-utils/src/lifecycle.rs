// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::cell::RefCell;

/// Snapshot of the lifecycle events recorded on the current thread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleCounts {
    /// Values built with [`Tracked::new`].
    pub created: usize,
    /// Values built with `Tracked::default()`.
    pub defaults: usize,
    /// Values built with `Tracked::clone()`.
    pub clones: usize,
    /// Calls to `Tracked::clone_from()`. Assignment neither builds nor drops.
    pub assignments: usize,
    /// Values dropped.
    pub drops: usize,
}

impl LifecycleCounts {
    /// Total number of values brought to life.
    pub fn constructed(&self) -> usize {
        self.created + self.defaults + self.clones
    }

    /// Number of values still alive.
    ///
    /// # Panics
    ///
    /// Panics if more values were dropped than constructed, i.e. something
    /// was dropped twice.
    pub fn live(&self) -> usize {
        self.constructed()
            .checked_sub(self.drops)
            .unwrap_or_else(|| panic!("double drop detected: {self:?}"))
    }
}

#[derive(Debug, Default)]
struct Ledger {
    counts: LifecycleCounts,
    attempts: [usize; 3],
    armed: [Option<usize>; 3],
}

thread_local! {
    static LEDGER: RefCell<Ledger> = RefCell::new(Ledger::default());
}

/// Operations that can be armed to fail.
#[derive(Clone, Copy)]
enum Fallible {
    Default = 0,
    Clone = 1,
    Assign = 2,
}

/// Records an attempt of `op`. Returns the attempt ordinal if it was armed to
/// fail; otherwise counts the operation as done.
fn attempt(op: Fallible) -> Option<usize> {
    LEDGER.with(|ledger| {
        let mut ledger = ledger.borrow_mut();
        let slot = op as usize;

        ledger.attempts[slot] += 1;
        let ordinal = ledger.attempts[slot];

        if ledger.armed[slot] == Some(ordinal) {
            return Some(ordinal);
        }

        match op {
            Fallible::Default => ledger.counts.defaults += 1,
            Fallible::Clone => ledger.counts.clones += 1,
            Fallible::Assign => ledger.counts.assignments += 1,
        }

        None
    })
}

fn record_created() {
    LEDGER.with(|ledger| ledger.borrow_mut().counts.created += 1);
}

fn record_dropped() {
    LEDGER.with(|ledger| ledger.borrow_mut().counts.drops += 1);
}

/// Handle over the current thread's lifecycle ledger.
///
/// Each test runs on its own thread, so ledgers never leak across tests.
///
/// # Example
///
/// ```rust
/// use rampart_test_utils::{Lifecycle, Tracked};
///
/// let lifecycle = Lifecycle::start();
/// {
///     let a = Tracked::new(7);
///     let _b = a.clone();
/// }
///
/// let counts = lifecycle.counts();
/// assert_eq!(counts.constructed(), 2);
/// assert_eq!(counts.live(), 0);
/// ```
#[derive(Debug)]
pub struct Lifecycle {
    _private: (),
}

impl Lifecycle {
    /// Clears every counter and disarms every injected failure.
    pub fn start() -> Self {
        LEDGER.with(|ledger| *ledger.borrow_mut() = Ledger::default());
        Self { _private: () }
    }

    /// Current counters.
    pub fn counts(&self) -> LifecycleCounts {
        LEDGER.with(|ledger| ledger.borrow().counts)
    }

    /// The `n`-th call to `Tracked::default()` since `start()` panics
    /// (1-based). A failed call builds nothing and is not counted in
    /// [`LifecycleCounts::defaults`].
    pub fn fail_default_at(&self, n: usize) {
        Self::arm(Fallible::Default, n);
    }

    /// The `n`-th call to `Tracked::clone()` since `start()` panics.
    pub fn fail_clone_at(&self, n: usize) {
        Self::arm(Fallible::Clone, n);
    }

    /// The `n`-th call to `Tracked::clone_from()` since `start()` panics.
    pub fn fail_assign_at(&self, n: usize) {
        Self::arm(Fallible::Assign, n);
    }

    /// Disarms every injected failure, keeping the counters.
    pub fn disarm(&self) {
        LEDGER.with(|ledger| ledger.borrow_mut().armed = [None; 3]);
    }

    fn arm(op: Fallible, n: usize) {
        LEDGER.with(|ledger| ledger.borrow_mut().armed[op as usize] = Some(n));
    }
}

/// An element type whose lifecycle is recorded in the thread's ledger.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tracked {
    value: u64,
}

impl Tracked {
    /// Creates a value, recorded as `created`.
    pub fn new(value: u64) -> Self {
        record_created();
        Self { value }
    }

    /// The payload.
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl Default for Tracked {
    fn default() -> Self {
        if let Some(n) = attempt(Fallible::Default) {
            panic!("Tracked: injected failure at default #{n}");
        }

        Self { value: 0 }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if let Some(n) = attempt(Fallible::Clone) {
            panic!("Tracked: injected failure at clone #{n}");
        }

        Self { value: self.value }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Some(n) = attempt(Fallible::Assign) {
            panic!("Tracked: injected failure at assignment #{n}");
        }

        self.value = source.value;
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        record_dropped();
    }
}
