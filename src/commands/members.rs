// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::NewMember;
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRepository::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let monthly_income = parse_decimal(sub.get_one::<String>("income").unwrap())?;
            if monthly_income.is_sign_negative() {
                return Err(anyhow!("Monthly income must not be negative"));
            }
            let member = repo.add_member(
                &cfg.owner,
                NewMember {
                    name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                    role: sub.get_one::<String>("role").unwrap().trim().to_string(),
                    avatar: sub.get_one::<String>("avatar").map(|s| s.trim().to_string()),
                    monthly_income,
                },
            )?;
            println!("Added member '{}' (id {})", member.name, member.id);
        }
        Some(("list", sub)) => {
            let members = repo.members(&cfg.owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &members)? {
                let data = members
                    .iter()
                    .map(|m| {
                        vec![
                            m.id.to_string(),
                            m.name.clone(),
                            m.role.clone(),
                            fmt_money(&m.monthly_income),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Role", "Monthly income"], data)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
