// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Racing tile loads driven by a local executor.

use std::cell::RefCell;
use std::rc::Rc;

use atlas_host::{LoadError, TileStore};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

type Store = Rc<RefCell<TileStore<u32, String>>>;

/// Starts a load for `key` whose result is delivered through the returned
/// sender.
fn start(pool: &LocalPool, store: &Store, key: u32) -> oneshot::Sender<Result<String, LoadError>> {
    let (tx, rx) = oneshot::channel();
    let ticket = store.borrow_mut().begin(key).expect("idle key");
    let store = store.clone();
    pool.spawner()
        .spawn_local(async move {
            let done = ticket
                .run(async move { rx.await.unwrap_or(Err(LoadError::Failed("dropped".into()))) })
                .await;
            store.borrow_mut().settle(done);
        })
        .unwrap();
    tx
}

#[test]
fn final_state_matches_unaborted_successes() {
    let mut pool = LocalPool::new();
    let store: Store = Rc::new(RefCell::new(TileStore::new(16).unwrap()));

    let senders: Vec<_> = (0..4).map(|k| start(&pool, &store, k)).collect();
    pool.run_until_stalled();
    assert_eq!(store.borrow().loading_count(), 4);
    assert!(store.borrow_mut().begin(2).is_none(), "no duplicate fetch");

    // Abort cell 1, then resolve in reverse order.
    assert!(store.borrow_mut().abort(&1));
    for (k, tx) in senders.into_iter().enumerate().rev() {
        let result = if k == 2 {
            Err(LoadError::Decode("corrupt".into()))
        } else {
            Ok(format!("tile {k}"))
        };
        let _ = tx.send(result);
        pool.run_until_stalled();
    }

    let store = store.borrow();
    assert_eq!(store.loading_count(), 0);
    assert_eq!(store.get(&0).map(String::as_str), Some("tile 0"));
    assert!(store.get(&1).is_none());
    assert!(store.error(&1).is_none());
    assert!(store.get(&2).is_none());
    assert_eq!(store.error(&2), Some(&LoadError::Decode("corrupt".into())));
    assert_eq!(store.get(&3).map(String::as_str), Some("tile 3"));
}

#[test]
fn aborted_cell_can_be_requested_again() {
    let mut pool = LocalPool::new();
    let store: Store = Rc::new(RefCell::new(TileStore::new(4).unwrap()));

    let first = start(&pool, &store, 7);
    pool.run_until_stalled();
    store.borrow_mut().abort(&7);
    let second = start(&pool, &store, 7);

    let _ = second.send(Ok("fresh".into()));
    pool.run_until_stalled();
    let _ = first.send(Ok("stale".into()));
    pool.run_until_stalled();

    assert_eq!(store.borrow().get(&7).map(String::as_str), Some("fresh"));
}
