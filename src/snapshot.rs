// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::{Account, Bill, Card, Goal, Member, Transaction};
use crate::repository::{FinanceRepository, SqliteRepository};

/// Everything one owner has, as of the last load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
    pub cards: Vec<Card>,
    pub members: Vec<Member>,
    pub goals: Vec<Goal>,
    pub bills: Vec<Bill>,
}

/// Holds the current snapshot. Replacement swaps the whole `Arc`, so a
/// reader keeps whichever complete snapshot it cloned.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    version: AtomicU64,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            version: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, next: Snapshot) -> u64 {
        let next = Arc::new(next);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of replacements so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

/// Reloads the store whenever another connection commits to the database.
///
/// SQLite bumps `PRAGMA data_version` on this connection only for commits
/// made elsewhere, which is exactly the change feed we need.
pub struct ChangeWatcher<'c> {
    repo: SqliteRepository<'c>,
    owner: String,
    last_seen: i64,
}

impl<'c> ChangeWatcher<'c> {
    pub fn new(conn: &'c Connection, owner: &str) -> Result<Self> {
        let last_seen = data_version(conn)?;
        Ok(Self {
            repo: SqliteRepository::new(conn),
            owner: owner.to_string(),
            last_seen,
        })
    }

    /// Load the full snapshot into `store`, regardless of change state.
    pub fn refresh(&mut self, store: &SnapshotStore) -> Result<u64> {
        self.last_seen = data_version(self.repo.conn())?;
        let snap = self.repo.load_snapshot(&self.owner)?;
        Ok(store.replace(snap))
    }

    /// Returns true when a change was seen and the store was reloaded.
    pub fn poll(&mut self, store: &SnapshotStore) -> Result<bool> {
        let seen = data_version(self.repo.conn())?;
        if seen == self.last_seen {
            return Ok(false);
        }
        let version = self.refresh(store)?;
        log::info!("snapshot reloaded for owner '{}' (version {})", self.owner, version);
        Ok(true)
    }
}

fn data_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA data_version", [], |r| r.get(0))?)
}
