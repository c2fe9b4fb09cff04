// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{AccountKind, NewAccount};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRepository::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let typ = sub.get_one::<String>("type").unwrap().parse::<AccountKind>()?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let acct = repo.add_account(
                &cfg.owner,
                NewAccount {
                    name,
                    r#type: typ,
                    balance,
                },
            )?;
            println!(
                "Added account '{}' ({}, balance {})",
                acct.name,
                acct.r#type,
                fmt_money(&acct.balance)
            );
        }
        Some(("list", sub)) => {
            let accounts = repo.accounts(&cfg.owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let data = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.r#type.to_string(),
                            fmt_money(&a.balance),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Type", "Balance"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
