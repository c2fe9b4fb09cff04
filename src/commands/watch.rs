// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::thread;
use std::time::Duration;

use crate::cli::filters_from;
use crate::commands::reports::render;
use crate::config::Config;
use crate::engine::compute_stats;
use crate::snapshot::{ChangeWatcher, SnapshotStore};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

/// Runs until interrupted, reprinting the dashboard after each committed change.
pub fn handle(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let interval = Duration::from_millis(*sub.get_one::<u64>("interval-ms").unwrap());
    let store = SnapshotStore::default();
    let mut watcher = ChangeWatcher::new(conn, &cfg.owner)?;
    watcher.refresh(&store)?;
    print_stats(&store, sub)?;

    loop {
        thread::sleep(interval);
        if watcher.poll(&store)? {
            print_stats(&store, sub)?;
        }
    }
}

fn print_stats(store: &SnapshotStore, sub: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from(sub, Local::now().date_naive())?;
    let snap = store.current();
    let stats = compute_stats(&snap, &filters);
    println!(
        "-- snapshot v{} at {} --\n{}",
        store.version(),
        Local::now().format("%H:%M:%S"),
        render(&stats, &filters)
    );
    Ok(())
}
