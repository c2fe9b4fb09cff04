// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub const DB_ENV: &str = "HEARTHBOOK_DB";
pub const OWNER_ENV: &str = "HEARTHBOOK_OWNER";
pub const DEFAULT_OWNER: &str = "local";

/// Resolved runtime settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub owner: String,
}

impl Config {
    /// Database path: `--db`/`HEARTHBOOK_DB` (both arrive through clap), else the platform data dir.
    pub fn db_path_from(matches: &clap::ArgMatches) -> Result<PathBuf> {
        match matches.get_one::<String>("db") {
            Some(p) if !p.trim().is_empty() => Ok(PathBuf::from(p.trim())),
            _ => crate::db::default_db_path(),
        }
    }

    /// Owner: `--owner`/`HEARTHBOOK_OWNER`, then the stored setting, then `local`.
    pub fn resolve(conn: &Connection, db_path: PathBuf, matches: &clap::ArgMatches) -> Result<Self> {
        let owner = match matches
            .get_one::<String>("owner")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            Some(o) => o.to_string(),
            None => get_setting(conn, "owner")?.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        };
        log::debug!("owner '{}', database {}", owner, db_path.display());
        Ok(Self { db_path, owner })
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
