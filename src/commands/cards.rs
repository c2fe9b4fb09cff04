// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{validate_card_digits, validate_day, CardTheme, NewCard};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let card = NewCard {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        closing_day: validate_day(*sub.get_one::<u32>("closing-day").unwrap())?,
        due_day: validate_day(*sub.get_one::<u32>("due-day").unwrap())?,
        limit: parse_decimal(sub.get_one::<String>("limit").unwrap())?,
        balance: parse_decimal(sub.get_one::<String>("balance").unwrap())?,
        theme: sub.get_one::<String>("theme").unwrap().parse::<CardTheme>()?,
        logo: sub.get_one::<String>("logo").map(|s| s.trim().to_string()),
        last_digits: validate_card_digits(sub.get_one::<String>("last-digits").unwrap())?,
    };
    if card.balance > card.limit {
        log::warn!("card '{}' starts above its limit", card.name);
    }
    let card = SqliteRepository::new(conn).add_card(&cfg.owner, card)?;
    println!(
        "Added card '{}' *{} (limit {}, due day {})",
        card.name,
        card.last_digits,
        fmt_money(&card.limit),
        card.due_day
    );
    Ok(())
}

#[derive(Serialize)]
struct CardRow {
    id: i64,
    name: String,
    last_digits: String,
    theme: String,
    limit: String,
    balance: String,
    usage: String,
    next_due: String,
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    let cards = SqliteRepository::new(conn).cards(&cfg.owner)?;
    let data: Vec<CardRow> = cards
        .iter()
        .map(|c| CardRow {
            id: c.id,
            name: c.name.clone(),
            last_digits: c.last_digits.clone(),
            theme: c.theme.to_string(),
            limit: fmt_money(&c.limit),
            balance: fmt_money(&c.balance),
            usage: fmt_percent(&c.usage_percent()),
            next_due: c.next_due_date(today).to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name,
                    r.last_digits,
                    r.theme,
                    r.limit,
                    r.balance,
                    r.usage,
                    r.next_due,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Digits", "Theme", "Limit", "Owed", "Usage", "Next due"],
                rows
            )
        );
    }
    Ok(())
}
