// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{set_setting, Config};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
            let rows = stmt.query_map([], |r| Ok(vec![r.get::<_, String>(0)?, r.get::<_, String>(1)?]))?;
            let mut data = vec![
                vec!["database".to_string(), cfg.db_path.display().to_string()],
                vec!["active owner".to_string(), cfg.owner.clone()],
            ];
            for row in rows {
                data.push(row?);
            }
            println!("{}", pretty_table(&["Setting", "Value"], data));
        }
        Some(("set-owner", sub)) => {
            let owner = sub.get_one::<String>("ID").unwrap().trim();
            if owner.is_empty() {
                return Err(anyhow!("Owner id must not be empty"));
            }
            set_setting(conn, "owner", owner)?;
            println!("Default owner set to '{}'", owner);
        }
        _ => {}
    }
    Ok(())
}
