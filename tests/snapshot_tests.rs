// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use hearthbook::db::open_or_init;
use hearthbook::snapshot::{ChangeWatcher, Snapshot, SnapshotStore};
use tempfile::tempdir;

#[test]
fn replace_swaps_whole_snapshot_and_bumps_version() {
    let store = SnapshotStore::default();
    assert_eq!(store.version(), 0);
    let before = store.current();
    assert!(before.transactions.is_empty());

    let v = store.replace(Snapshot::default());
    assert_eq!(v, 1);
    assert_eq!(store.replace(Snapshot::default()), 2);
    assert_eq!(store.version(), 2);
    // a reader holding the old Arc is unaffected
    assert!(before.accounts.is_empty());
}

#[test]
fn watcher_reloads_after_commit_on_other_connection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("family.sqlite");
    let reader = open_or_init(&path).unwrap();
    let writer = open_or_init(&path).unwrap();

    let store = SnapshotStore::default();
    let mut watcher = ChangeWatcher::new(&reader, "casa").unwrap();
    watcher.refresh(&store).unwrap();
    assert!(store.current().accounts.is_empty());
    assert!(!watcher.poll(&store).unwrap());

    writer
        .execute(
            "INSERT INTO accounts(owner_id,name,type,balance) VALUES ('casa','Poupança','savings','900')",
            [],
        )
        .unwrap();

    assert!(watcher.poll(&store).unwrap());
    let snap = store.current();
    assert_eq!(snap.accounts.len(), 1);
    assert_eq!(snap.accounts[0].name, "Poupança");
    assert!(!watcher.poll(&store).unwrap());
}

#[test]
fn watcher_only_loads_its_owner() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("family.sqlite");
    let reader = open_or_init(&path).unwrap();
    let writer = open_or_init(&path).unwrap();

    let store = SnapshotStore::default();
    let mut watcher = ChangeWatcher::new(&reader, "casa").unwrap();
    writer
        .execute(
            "INSERT INTO accounts(owner_id,name,type,balance) VALUES ('vizinho','Conta','checking','1')",
            [],
        )
        .unwrap();
    assert!(watcher.poll(&store).unwrap());
    assert!(store.current().accounts.is_empty());
    assert_eq!(store.version(), 1);
}
