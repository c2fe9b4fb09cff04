// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::parse_id;
use crate::config::Config;
use crate::models::{NewBill, Status};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRepository::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let bill = repo.add_bill(
                &cfg.owner,
                NewBill {
                    description: sub.get_one::<String>("description").unwrap().trim().to_string(),
                    value: parse_decimal(sub.get_one::<String>("value").unwrap())?,
                    due_date: parse_date(sub.get_one::<String>("due").unwrap())?,
                    status: sub.get_one::<String>("status").unwrap().parse::<Status>()?,
                    account_id: sub
                        .get_one::<String>("account")
                        .map(|s| parse_id(s, "account"))
                        .transpose()?,
                },
            )?;
            println!(
                "Added bill '{}' {} due {}",
                bill.description,
                fmt_money(&bill.value),
                bill.due_date
            );
        }
        Some(("list", sub)) => {
            let today = Local::now().date_naive();
            let mut bills = repo.bills(&cfg.owner)?;
            if sub.get_flag("pending") {
                bills.retain(|b| b.status == Status::Pending);
            }
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &bills)? {
                let data = bills
                    .iter()
                    .map(|b| {
                        let overdue = b.status == Status::Pending && b.due_date < today;
                        vec![
                            b.id.to_string(),
                            b.due_date.to_string(),
                            b.description.clone(),
                            fmt_money(&b.value),
                            if overdue {
                                "overdue".to_string()
                            } else {
                                b.status.to_string()
                            },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Due", "Description", "Value", "Status"], data)
                );
            }
        }
        Some(("pay", sub)) => set_status(&repo, cfg, sub, Status::Paid)?,
        Some(("unpay", sub)) => set_status(&repo, cfg, sub, Status::Pending)?,
        _ => {}
    }
    Ok(())
}

fn set_status(
    repo: &SqliteRepository<'_>,
    cfg: &Config,
    sub: &clap::ArgMatches,
    status: Status,
) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap(), "bill")?;
    repo.update_bill_status(&cfg.owner, id, status)?;
    println!("Bill {} marked {}", id, status);
    Ok(())
}
