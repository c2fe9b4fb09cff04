// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::utils::percent_of;

static CARD_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Implements `as_str`, `Display` and `FromStr` for a closed set of lowercase labels.
macro_rules! labelled_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = FinanceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok($ty::$variant),)+
                    _ => Err(FinanceError::UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

labelled_enum!(TransactionType, "transaction type", {
    Income => "income",
    Expense => "expense",
});

/// Settlement state shared by transactions and bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Paid,
    Pending,
}

labelled_enum!(Status, "status", {
    Paid => "paid",
    Pending => "pending",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Card,
}

labelled_enum!(AccountKind, "account type", {
    Checking => "checking",
    Savings => "savings",
    Card => "card",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    Black,
    Lime,
    White,
}

labelled_enum!(CardTheme, "card theme", {
    Black => "black",
    Lime => "lime",
    White => "white",
});

/// Where a transaction was posted. Accounts and cards live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Posting {
    Account(i64),
    Card(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installments {
    pub current: u32,
    pub total: u32,
}

impl Installments {
    pub fn new(current: u32, total: u32) -> Result<Self, FinanceError> {
        if current == 0 || current > total {
            return Err(FinanceError::InvalidInstallments { current, total });
        }
        Ok(Self { current, total })
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.current, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub r#type: TransactionType,
    pub value: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub posting: Option<Posting>,
    pub member_id: Option<i64>,
    pub installments: Option<Installments>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: AccountKind,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub closing_day: u32,
    pub due_day: u32,
    pub limit: Decimal,
    pub balance: Decimal,
    pub theme: CardTheme,
    pub logo: Option<String>,
    pub last_digits: String,
}

impl Card {
    /// Share of the limit currently owed, in percent.
    pub fn usage_percent(&self) -> Decimal {
        percent_of(self.balance, self.limit)
    }

    /// Next statement due date on or after `today`. Short months clamp to their last day.
    pub fn next_due_date(&self, today: NaiveDate) -> NaiveDate {
        let this_month = clamp_day(today.year(), today.month(), self.due_day);
        if this_month >= today {
            return this_month;
        }
        let (y, m) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        clamp_day(y, m, self.due_day)
    }
}

fn clamp_day(year: i32, month: u32, day: u32) -> NaiveDate {
    let mut d = day.clamp(1, 31);
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, d) {
            return date;
        }
        d -= 1;
    }
}

pub fn validate_day(day: u32) -> Result<u32, FinanceError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(FinanceError::InvalidDay(day))
    }
}

pub fn validate_card_digits(digits: &str) -> Result<String, FinanceError> {
    let digits = digits.trim();
    if CARD_DIGITS.is_match(digits) {
        Ok(digits.to_string())
    } else {
        Err(FinanceError::InvalidCardDigits(digits.to_string()))
    }
}

pub fn card_digits_valid(digits: &str) -> bool {
    CARD_DIGITS.is_match(digits)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub monthly_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target: Decimal,
    pub current: Decimal,
    pub category: String,
    pub image: Option<String>,
}

impl Goal {
    /// Progress towards the target in percent, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        percent_of(self.current, self.target).min(Decimal::ONE_HUNDRED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub description: String,
    pub value: Decimal,
    pub due_date: NaiveDate,
    pub status: Status,
    pub account_id: Option<i64>,
}

// Insert payloads: the same shapes without the storage-assigned id.

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub r#type: TransactionType,
    pub value: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub posting: Option<Posting>,
    pub member_id: Option<i64>,
    pub installments: Option<Installments>,
    pub status: Status,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub r#type: AccountKind,
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub closing_day: u32,
    pub due_day: u32,
    pub limit: Decimal,
    pub balance: Decimal,
    pub theme: CardTheme,
    pub logo: Option<String>,
    pub last_digits: String,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub monthly_income: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target: Decimal,
    pub current: Decimal,
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBill {
    pub description: String,
    pub value: Decimal,
    pub due_date: NaiveDate,
    pub status: Status,
    pub account_id: Option<i64>,
}

/// Transaction type selector used by the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

labelled_enum!(TypeFilter, "type filter", {
    All => "all",
    Income => "income",
    Expense => "expense",
});

impl TypeFilter {
    pub fn admits(&self, t: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => t == TransactionType::Income,
            TypeFilter::Expense => t == TransactionType::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, FinanceError> {
        if from > to {
            return Err(FinanceError::InvertedRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// The active view over the transaction list. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub search: String,
    pub r#type: TypeFilter,
    pub member_id: Option<i64>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// One month of the cash-flow series, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceStats {
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub savings_rate: Decimal,
    pub category_breakdown: Vec<CategoryShare>,
    pub balance_growth: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn card(due_day: u32, limit: i64, balance: i64) -> Card {
        Card {
            id: 1,
            name: "Visa".into(),
            closing_day: 1,
            due_day,
            limit: Decimal::from(limit),
            balance: Decimal::from(balance),
            theme: CardTheme::Black,
            logo: None,
            last_digits: "1234".into(),
        }
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(" Income ".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("LIME".parse::<CardTheme>().unwrap(), CardTheme::Lime);
        let err = "transfer".parse::<TransactionType>().unwrap_err();
        assert!(err.to_string().contains("transfer"));
    }

    #[test]
    fn installments_reject_out_of_range() {
        assert!(Installments::new(0, 3).is_err());
        assert!(Installments::new(4, 3).is_err());
        assert_eq!(Installments::new(2, 3).unwrap().label(), "2/3");
    }

    #[test]
    fn next_due_date_clamps_and_rolls_over() {
        let c = card(31, 1000, 0);
        assert_eq!(c.next_due_date(d(2024, 2, 10)), d(2024, 2, 29));
        let c = card(5, 1000, 0);
        assert_eq!(c.next_due_date(d(2024, 12, 20)), d(2025, 1, 5));
        assert_eq!(c.next_due_date(d(2024, 3, 5)), d(2024, 3, 5));
    }

    #[test]
    fn card_usage_handles_zero_limit() {
        assert_eq!(card(1, 0, 50).usage_percent(), Decimal::ZERO);
        assert_eq!(card(1, 1000, 250).usage_percent(), Decimal::from(25));
    }

    #[test]
    fn goal_progress_caps_at_hundred() {
        let mut g = Goal {
            id: 1,
            name: "Trip".into(),
            target: Decimal::from(200),
            current: Decimal::from(50),
            category: "Travel".into(),
            image: None,
        };
        assert_eq!(g.progress_percent(), Decimal::from(25));
        g.current = Decimal::from(500);
        assert_eq!(g.progress_percent(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn card_digits_must_be_four() {
        assert_eq!(validate_card_digits(" 4242 ").unwrap(), "4242");
        assert!(validate_card_digits("42a2").is_err());
        assert!(validate_card_digits("12345").is_err());
    }
}
