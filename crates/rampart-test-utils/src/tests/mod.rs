// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::{Lifecycle, LifecycleCounts, Tracked};

// =============================================================================
// Lifecycle::start()
// =============================================================================

#[test]
fn test_start_resets_counters() {
    let first = Lifecycle::start();
    drop(Tracked::new(1));
    assert_eq!(first.counts().drops, 1);

    let lifecycle = Lifecycle::start();

    assert_eq!(lifecycle.counts(), LifecycleCounts::default());
}

// =============================================================================
// counts()
// =============================================================================

#[test]
fn test_counts_every_event() {
    let lifecycle = Lifecycle::start();

    let a = Tracked::new(7);
    let mut b = Tracked::default();
    let c = a.clone();
    b.clone_from(&c);

    assert_eq!(b.value(), 7);

    let counts = lifecycle.counts();
    assert_eq!(counts.created, 1);
    assert_eq!(counts.defaults, 1);
    assert_eq!(counts.clones, 1);
    assert_eq!(counts.assignments, 1);
    assert_eq!(counts.drops, 0);
    assert_eq!(counts.live(), 3);

    drop((a, b, c));

    assert_eq!(lifecycle.counts().live(), 0);
}

#[test]
#[should_panic(expected = "double drop detected")]
fn test_live_detects_double_drop() {
    let counts = LifecycleCounts {
        created: 1,
        drops: 2,
        ..LifecycleCounts::default()
    };

    let _ = counts.live();
}

// =============================================================================
// fail_*_at()
// =============================================================================

#[test]
fn test_fail_clone_at() {
    let lifecycle = Lifecycle::start();
    lifecycle.fail_clone_at(2);

    let source = Tracked::new(3);
    let first = source.clone();

    let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
    assert!(result.is_err());

    // Only the nth attempt fails
    let third = source.clone();

    let counts = lifecycle.counts();
    assert_eq!(counts.clones, 2);
    assert_eq!(counts.live(), 3);

    drop((source, first, third));
    assert_eq!(lifecycle.counts().live(), 0);
}

#[test]
fn test_fail_default_at_first_call() {
    let lifecycle = Lifecycle::start();
    lifecycle.fail_default_at(1);

    let result = catch_unwind(Tracked::default);
    assert!(result.is_err());
    assert_eq!(lifecycle.counts().defaults, 0);
}

#[test]
fn test_fail_assign_at_keeps_target() {
    let lifecycle = Lifecycle::start();
    lifecycle.fail_assign_at(1);

    let mut target = Tracked::new(1);
    let source = Tracked::new(2);

    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));

    assert!(result.is_err());
    assert_eq!(target.value(), 1);
    assert_eq!(lifecycle.counts().assignments, 0);
}

#[test]
fn test_disarm() {
    let lifecycle = Lifecycle::start();
    lifecycle.fail_default_at(1);
    lifecycle.disarm();

    let value = Tracked::default();

    assert_eq!(value.value(), 0);
    assert_eq!(lifecycle.counts().defaults, 1);
}
