// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::NewGoal;
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRepository::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
            let current = parse_decimal(sub.get_one::<String>("current").unwrap())?;
            if target <= rust_decimal::Decimal::ZERO {
                return Err(anyhow!("Goal target must be positive, got {}", target));
            }
            if current.is_sign_negative() {
                return Err(anyhow!("Goal progress must not be negative, got {}", current));
            }
            let goal = repo.add_goal(
                &cfg.owner,
                NewGoal {
                    name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                    target,
                    current,
                    category: sub.get_one::<String>("category").unwrap().trim().to_string(),
                    image: sub.get_one::<String>("image").map(|s| s.trim().to_string()),
                },
            )?;
            println!(
                "Added goal '{}' ({} of {})",
                goal.name,
                fmt_money(&goal.current),
                fmt_money(&goal.target)
            );
        }
        Some(("list", sub)) => {
            let goals = repo.goals(&cfg.owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
                let data = goals
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            g.category.clone(),
                            fmt_money(&g.current),
                            fmt_money(&g.target),
                            fmt_percent(&g.progress_percent()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Goal", "Category", "Saved", "Target", "Progress"],
                        data
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}
