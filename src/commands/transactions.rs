// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::{filters_from, parse_id};
use crate::config::Config;
use crate::engine::filter_transactions;
use crate::models::{Installments, NewTransaction, Posting, Status, TransactionType};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::snapshot::Snapshot;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
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
    let r#type = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;
    let value = parse_decimal(sub.get_one::<String>("value").unwrap())?;
    if value.is_sign_negative() {
        return Err(anyhow!("Transaction value must not be negative, got {}", value));
    }
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let posting = match (sub.get_one::<String>("account"), sub.get_one::<String>("card")) {
        (Some(a), _) => Some(Posting::Account(parse_id(a, "account")?)),
        (None, Some(c)) => Some(Posting::Card(parse_id(c, "card")?)),
        (None, None) => None,
    };
    let member_id = sub
        .get_one::<String>("member")
        .map(|s| parse_id(s, "member"))
        .transpose()?;
    let installments = match sub.get_one::<u32>("installments") {
        Some(&n) if n > 1 => Some(Installments::new(1, n)?),
        _ => None,
    };
    let status = sub.get_one::<String>("status").unwrap().parse::<Status>()?;

    let repo = SqliteRepository::new(conn);
    let tx = repo.add_transaction(
        &cfg.owner,
        NewTransaction {
            r#type,
            value,
            description,
            category,
            date,
            posting,
            member_id,
            installments,
            status,
        },
    )?;
    println!(
        "Recorded {} {} on {} '{}' ({})",
        tx.r#type,
        fmt_money(&tx.value),
        tx.date,
        tx.description,
        tx.category
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = Local::now().date_naive();
    let data = query_rows(conn, &cfg.owner, sub, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.value.clone(),
                    r.posted_to.clone(),
                    r.member.clone(),
                    r.installments.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Type",
                    "Description",
                    "Category",
                    "Value",
                    "Account",
                    "Member",
                    "Inst.",
                    "Status"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub description: String,
    pub category: String,
    pub value: String,
    pub posted_to: String,
    pub member: String,
    pub installments: String,
    pub status: String,
}

/// The filtered transaction view, newest first, with names resolved.
pub fn query_rows(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<TransactionRow>> {
    let filters = filters_from(sub, today)?;
    let snap = SqliteRepository::new(conn).load_snapshot(owner)?;
    let limit = sub.try_get_one::<usize>("limit").ok().flatten().copied().unwrap_or(usize::MAX);

    Ok(filter_transactions(&snap.transactions, &filters)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            description: t.description.clone(),
            category: t.category.clone(),
            value: fmt_money(&t.value),
            posted_to: posting_name(&snap, t.posting),
            member: t
                .member_id
                .map(|id| member_name(&snap, id))
                .unwrap_or_default(),
            installments: t.installments.map(|i| i.label()).unwrap_or_default(),
            status: t.status.to_string(),
        })
        .collect())
}

pub fn posting_name(snap: &Snapshot, posting: Option<Posting>) -> String {
    match posting {
        Some(Posting::Account(id)) => snap
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| format!("account #{}", id)),
        Some(Posting::Card(id)) => snap
            .cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| format!("{} *{}", c.name, c.last_digits))
            .unwrap_or_else(|| format!("card #{}", id)),
        None => String::new(),
    }
}

pub fn member_name(snap: &Snapshot, id: i64) -> String {
    snap.members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| format!("member #{}", id))
}
