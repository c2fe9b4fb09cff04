// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filters_from;
use crate::config::Config;
use crate::engine::{compute_stats, monthly_flow};
use crate::models::{Filters, FinanceStats, MonthlyFlow};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    let stats = stats_for(conn, &cfg.owner, sub, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        let filters = filters_from(sub, today)?;
        println!("{}", render(&stats, &filters));
    }
    Ok(())
}

pub fn handle_flow(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let flow = flow_for(conn, &cfg.owner, sub, Local::now().date_naive())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &flow)? {
        let rows = flow
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    fmt_money(&m.income),
                    fmt_money(&m.expense),
                    fmt_money(&m.income.saturating_sub(m.expense)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}

pub fn flow_for(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<MonthlyFlow>> {
    let months = *sub.get_one::<u32>("months").unwrap();
    let snap = SqliteRepository::new(conn).load_snapshot(owner)?;
    Ok(monthly_flow(&snap.transactions, today, months))
}

pub fn stats_for(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<FinanceStats> {
    let filters = filters_from(sub, today)?;
    let snap = SqliteRepository::new(conn).load_snapshot(owner)?;
    Ok(compute_stats(&snap, &filters))
}

pub fn render(stats: &FinanceStats, filters: &Filters) -> String {
    let period = match filters.date_range {
        Some(r) if r.from == chrono::NaiveDate::MIN => format!("up to {}", r.to),
        Some(r) if r.to == chrono::NaiveDate::MAX => format!("from {}", r.from),
        Some(r) => format!("{} .. {}", r.from, r.to),
        None => "all dates".to_string(),
    };
    let summary = pretty_table(
        &["Metric", "Value"],
        vec![
            vec!["Period".into(), period],
            vec!["Total balance".into(), fmt_money(&stats.total_balance)],
            vec!["Balance growth".into(), fmt_percent(&stats.balance_growth)],
            vec!["Income".into(), fmt_money(&stats.monthly_income)],
            vec!["Expense".into(), fmt_money(&stats.monthly_expense)],
            vec!["Savings rate".into(), fmt_percent(&stats.savings_rate)],
        ],
    );
    let breakdown = pretty_table(
        &["Category", "Spent", "% of income"],
        stats
            .category_breakdown
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.value),
                    fmt_percent(&c.percentage),
                ]
            })
            .collect(),
    );
    format!("{}\n{}", summary, breakdown)
}
