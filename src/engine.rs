// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard figures derived from a snapshot.
//!
//! Every function here is pure and total: zero incomes and empty inputs
//! resolve to zero, sums past the `Decimal` range pin to `Decimal::MAX` or
//! `Decimal::MIN`, and nothing is cached between calls.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    Account, Card, CategoryShare, Filters, FinanceStats, MonthlyFlow, Transaction,
    TransactionType,
};
use crate::snapshot::Snapshot;
use crate::utils::{month_bounds, percent_of, saturating_sum};

/// Whether `t` is visible under `filters`. All active conditions must hold.
pub fn matches(t: &Transaction, filters: &Filters) -> bool {
    filters.r#type.admits(t.r#type) && matches_scope(t, filters)
}

/// Search, member and date conditions, without the type selector.
fn matches_scope(t: &Transaction, filters: &Filters) -> bool {
    matches_search(t, &filters.search)
        && filters.member_id.is_none_or(|m| t.member_id == Some(m))
        && filters.date_range.is_none_or(|r| r.contains(t.date))
}

fn matches_search(t: &Transaction, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    t.description.to_lowercase().contains(&needle) || t.category.to_lowercase().contains(&needle)
}

pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filters: &Filters,
) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| matches(t, filters)).collect()
}

/// Sum of `kind` transactions under the search/member/date conditions.
///
/// `filters.type` is not consulted; each total is fixed to its own type.
pub fn period_total(
    transactions: &[Transaction],
    kind: TransactionType,
    filters: &Filters,
) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.r#type == kind && matches_scope(t, filters))
            .map(|t| t.value),
    )
}

pub fn period_income(transactions: &[Transaction], filters: &Filters) -> Decimal {
    period_total(transactions, TransactionType::Income, filters)
}

pub fn period_expense(transactions: &[Transaction], filters: &Filters) -> Decimal {
    period_total(transactions, TransactionType::Expense, filters)
}

/// Expense totals per category, largest first, each as a share of `income`.
pub fn category_breakdown(
    transactions: &[Transaction],
    income: Decimal,
    filters: &Filters,
) -> Vec<CategoryShare> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense && matches_scope(t, filters))
    {
        let entry = totals.entry(t.category.as_str()).or_insert_with(|| {
            order.push(t.category.as_str());
            Decimal::ZERO
        });
        *entry = entry.saturating_add(t.value);
    }

    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|category| {
            let value = totals[category];
            CategoryShare {
                category: category.to_string(),
                value,
                percentage: percent_of(value, income),
            }
        })
        .collect();
    // stable sort: equal values keep first-seen order
    shares.sort_by(|a, b| b.value.cmp(&a.value));
    shares
}

/// Net worth: account balances minus what is owed on cards.
pub fn total_balance(accounts: &[Account], cards: &[Card]) -> Decimal {
    let assets = saturating_sum(accounts.iter().map(|a| a.balance));
    let owed = saturating_sum(cards.iter().map(|c| c.balance));
    assets.saturating_sub(owed)
}

pub fn savings_rate(income: Decimal, expense: Decimal) -> Decimal {
    percent_of(income.saturating_sub(expense), income)
}

/// Percentage change from `previous` to `current`.
pub fn balance_growth(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    percent_of(current.saturating_sub(previous), previous.abs())
}

/// Balance before the active date range began, reconstructed by backing out
/// every income and expense dated inside the range.
fn balance_at_range_start(snapshot: &Snapshot, current: Decimal, filters: &Filters) -> Option<Decimal> {
    let range = filters.date_range?;
    let net = saturating_sum(
        snapshot
            .transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .map(|t| match t.r#type {
                TransactionType::Income => t.value,
                TransactionType::Expense => -t.value,
            }),
    );
    Some(current.saturating_sub(net))
}

pub fn compute_stats(snapshot: &Snapshot, filters: &Filters) -> FinanceStats {
    let income = period_income(&snapshot.transactions, filters);
    let expense = period_expense(&snapshot.transactions, filters);
    let total = total_balance(&snapshot.accounts, &snapshot.cards);
    let growth = balance_at_range_start(snapshot, total, filters)
        .map(|previous| balance_growth(total, previous))
        .unwrap_or(Decimal::ZERO);

    FinanceStats {
        total_balance: total,
        monthly_income: income,
        monthly_expense: expense,
        savings_rate: savings_rate(income, expense),
        category_breakdown: category_breakdown(&snapshot.transactions, income, filters),
        balance_growth: growth,
    }
}

/// Income and expense per calendar month for the `months` months ending with
/// the month of `today`, oldest first. Filters do not apply.
pub fn monthly_flow(transactions: &[Transaction], today: NaiveDate, months: u32) -> Vec<MonthlyFlow> {
    (0..months)
        .rev()
        .filter_map(|back| today.checked_sub_months(Months::new(back)))
        .map(|anchor| {
            let range = month_bounds(anchor);
            let (mut income, mut expense) = (Decimal::ZERO, Decimal::ZERO);
            for t in transactions.iter().filter(|t| range.contains(t.date)) {
                match t.r#type {
                    TransactionType::Income => income = income.saturating_add(t.value),
                    TransactionType::Expense => expense = expense.saturating_add(t.value),
                }
            }
            MonthlyFlow {
                month: range.from.format("%Y-%m").to_string(),
                income,
                expense,
            }
        })
        .collect()
}
