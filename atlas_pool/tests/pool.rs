// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `atlas_pool` crate.
//!
//! These exercise the eviction and pinning contract end to end: FIFO ring
//! overwrite, pinned entries surviving overwrite, and unlock returning keys
//! to the absent state.

use atlas_pool::{PoolError, ResourcePool};

#[test]
fn overflow_by_one_evicts_only_the_first_key() {
    for capacity in 1..=8_usize {
        let mut pool = ResourcePool::new(capacity).unwrap();
        for k in 0..=capacity {
            pool.set(k, k * 10);
        }
        assert_eq!(pool.get(&0), None, "capacity {capacity}: first key survived");
        for k in 1..=capacity {
            assert_eq!(
                pool.get(&k),
                Some(&(k * 10)),
                "capacity {capacity}: key {k} missing"
            );
        }
    }
}

#[test]
fn pinned_keys_survive_any_number_of_inserts() {
    let mut pool = ResourcePool::new(2).unwrap();
    pool.set("pinned", 1);
    pool.lock(&"pinned").unwrap();
    for i in 0..50 {
        pool.set(if i % 2 == 0 { "even" } else { "odd" }, i);
    }
    assert_eq!(pool.get(&"pinned"), Some(&1));
}

#[test]
fn unlock_then_fallback_runs_exactly_once() {
    let mut pool = ResourcePool::new(2).unwrap();
    pool.set('k', 1);
    pool.lock(&'k').unwrap();
    // Fill the ring so the old slot is long gone.
    pool.set('x', 0);
    pool.set('y', 0);
    assert_eq!(pool.get(&'k'), Some(&1));

    assert_eq!(pool.unlock(&'k'), Some(1));
    assert_eq!(pool.get(&'k'), None);

    let mut calls = 0;
    for _ in 0..3 {
        pool.get_or_insert_with('k', || {
            calls += 1;
            2
        });
    }
    assert_eq!(calls, 1);
    assert_eq!(pool.get(&'k'), Some(&2));
}

#[test]
fn lock_requires_presence() {
    let mut pool = ResourcePool::<&str, u8>::new(1).unwrap();
    assert_eq!(pool.lock(&"ghost"), Err(PoolError::NotFound));
    pool.set("real", 1);
    pool.set("other", 2); // evicts "real"
    assert_eq!(pool.lock(&"real"), Err(PoolError::NotFound));
    assert_eq!(pool.unlock(&"real"), None);
}

#[test]
fn scenario_pool_of_three() {
    let mut pool = ResourcePool::new(3).unwrap();
    pool.set('a', 'A');
    pool.set('b', 'B');
    pool.set('c', 'C');
    pool.lock(&'a').unwrap();

    pool.set('d', 'D');
    assert_eq!(pool.get(&'b'), Some(&'B'));

    pool.set('e', 'E');
    assert_eq!(pool.get(&'b'), None);
    for (k, v) in [('a', 'A'), ('c', 'C'), ('d', 'D'), ('e', 'E')] {
        assert_eq!(pool.get(&k), Some(&v), "{k} should be retrievable");
    }
}
