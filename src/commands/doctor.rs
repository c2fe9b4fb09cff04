// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{card_digits_valid, Posting};
use crate::repository::{FinanceRepository, SqliteRepository};
use crate::snapshot::Snapshot;
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config) -> Result<()> {
    let snap = SqliteRepository::new(conn).load_snapshot(&cfg.owner)?;
    let rows = find_issues(&snap);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// One `[issue, detail]` row per problem found in `snap`.
pub fn find_issues(snap: &Snapshot) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for c in &snap.cards {
        if c.balance > c.limit {
            rows.push(vec![
                "card_over_limit".into(),
                format!("{} owes {} of {}", c.name, fmt_money(&c.balance), fmt_money(&c.limit)),
            ]);
        }
        if !card_digits_valid(&c.last_digits) {
            rows.push(vec![
                "card_bad_digits".into(),
                format!("{} '{}'", c.name, c.last_digits),
            ]);
        }
    }

    for t in &snap.transactions {
        match t.posting {
            Some(Posting::Account(id)) if !snap.accounts.iter().any(|a| a.id == id) => {
                rows.push(vec!["txn_missing_account".into(), format!("txn {} -> account {}", t.id, id)]);
            }
            Some(Posting::Card(id)) if !snap.cards.iter().any(|c| c.id == id) => {
                rows.push(vec!["txn_missing_card".into(), format!("txn {} -> card {}", t.id, id)]);
            }
            _ => {}
        }
        if let Some(m) = t.member_id {
            if !snap.members.iter().any(|x| x.id == m) {
                rows.push(vec!["txn_missing_member".into(), format!("txn {} -> member {}", t.id, m)]);
            }
        }
        if t.value.is_sign_negative() {
            rows.push(vec!["txn_negative_value".into(), format!("txn {} {}", t.id, t.value)]);
        }
    }

    for b in &snap.bills {
        if let Some(a) = b.account_id {
            if !snap.accounts.iter().any(|x| x.id == a) {
                rows.push(vec!["bill_missing_account".into(), format!("bill {} -> account {}", b.id, a)]);
            }
        }
    }

    for g in &snap.goals {
        if g.target <= rust_decimal::Decimal::ZERO {
            rows.push(vec!["goal_bad_target".into(), format!("{} target {}", g.name, g.target)]);
        }
    }

    rows
}
