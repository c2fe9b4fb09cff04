// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::query_rows;
use crate::config::Config;
use anyhow::{Result, anyhow};
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, cfg, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let rows = query_rows(conn, &cfg.owner, sub, Local::now().date_naive())?;
    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date",
            "type",
            "description",
            "category",
            "value",
            "account",
            "member",
            "installments",
            "status",
        ])?;
        for r in &rows {
            wtr.write_record([
                &r.date,
                &r.r#type,
                &r.description,
                &r.category,
                &r.value,
                &r.posted_to,
                &r.member,
                &r.installments,
                &r.status,
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    log::info!("exported {} transactions as {}", rows.len(), fmt);
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
