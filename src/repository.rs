// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped persistence for every entity the dashboard shows.
//!
//! The aggregation code never sees a connection: callers load a
//! [`Snapshot`] through a [`FinanceRepository`] and hand plain collections on.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::FinanceError;
use crate::models::{
    Account, AccountKind, Bill, Card, CardTheme, Goal, Installments, Member, NewAccount, NewBill,
    NewCard, NewGoal, NewMember, NewTransaction, Posting, Status, Transaction, TransactionType,
};
use crate::snapshot::Snapshot;
use crate::utils::{amount_or_zero, parse_date};

pub trait FinanceRepository {
    fn load_snapshot(&self, owner: &str) -> Result<Snapshot>;
    fn add_transaction(&self, owner: &str, tx: NewTransaction) -> Result<Transaction>;
    fn add_account(&self, owner: &str, account: NewAccount) -> Result<Account>;
    fn add_card(&self, owner: &str, card: NewCard) -> Result<Card>;
    fn add_member(&self, owner: &str, member: NewMember) -> Result<Member>;
    fn add_goal(&self, owner: &str, goal: NewGoal) -> Result<Goal>;
    fn add_bill(&self, owner: &str, bill: NewBill) -> Result<Bill>;
    fn update_bill_status(&self, owner: &str, bill_id: i64, status: Status) -> Result<()>;
}

pub struct SqliteRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    pub fn transactions(&self, owner: &str) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, value, description, category, date, account_id, card_id,
                    member_id, installments_current, installments_total, status
             FROM transactions WHERE owner_id=?1
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, Option<i64>>(6)?,
                r.get::<_, Option<i64>>(7)?,
                r.get::<_, Option<i64>>(8)?,
                r.get::<_, Option<u32>>(9)?,
                r.get::<_, Option<u32>>(10)?,
                r.get::<_, String>(11)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, typ, value, description, category, date, acct, card, member, cur, tot, status) =
                row?;
            let posting = match (acct, card) {
                (Some(a), _) => Some(Posting::Account(a)),
                (None, Some(c)) => Some(Posting::Card(c)),
                (None, None) => None,
            };
            let installments = match (cur, tot) {
                (Some(c), Some(t)) => Some(
                    Installments::new(c, t)
                        .with_context(|| format!("Transaction {} installments", id))?,
                ),
                _ => None,
            };
            out.push(Transaction {
                id,
                r#type: typ
                    .parse::<TransactionType>()
                    .with_context(|| format!("Transaction {}", id))?,
                value: amount_or_zero(value.as_deref(), "transactions.value", id),
                description,
                category,
                date: parse_date(&date).with_context(|| format!("Transaction {} date", id))?,
                posting,
                member_id: member,
                installments,
                status: status
                    .parse::<Status>()
                    .with_context(|| format!("Transaction {}", id))?,
            });
        }
        Ok(out)
    }

    pub fn accounts(&self, owner: &str) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, balance FROM accounts WHERE owner_id=?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, typ, balance) = row?;
            out.push(Account {
                id,
                name,
                r#type: typ
                    .parse::<AccountKind>()
                    .with_context(|| format!("Account {}", id))?,
                balance: amount_or_zero(balance.as_deref(), "accounts.balance", id),
            });
        }
        Ok(out)
    }

    pub fn cards(&self, owner: &str) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, closing_day, due_day, limit_amount, balance, theme, logo, last_digits
             FROM cards WHERE owner_id=?1 ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, u32>(2)?,
                r.get::<_, u32>(3)?,
                r.get::<_, Option<String>>(4)?,
                r.get::<_, Option<String>>(5)?,
                r.get::<_, String>(6)?,
                r.get::<_, Option<String>>(7)?,
                r.get::<_, String>(8)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, closing_day, due_day, limit, balance, theme, logo, last_digits) = row?;
            out.push(Card {
                id,
                name,
                closing_day,
                due_day,
                limit: amount_or_zero(limit.as_deref(), "cards.limit_amount", id),
                balance: amount_or_zero(balance.as_deref(), "cards.balance", id),
                theme: theme
                    .parse::<CardTheme>()
                    .with_context(|| format!("Card {}", id))?,
                logo: logo.filter(|s| !s.is_empty()),
                last_digits,
            });
        }
        Ok(out)
    }

    pub fn members(&self, owner: &str) -> Result<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, role, avatar, monthly_income FROM members WHERE owner_id=?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<String>>(3)?,
                r.get::<_, Option<String>>(4)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, role, avatar, income) = row?;
            out.push(Member {
                id,
                name,
                role,
                avatar: avatar.filter(|s| !s.is_empty()),
                monthly_income: amount_or_zero(income.as_deref(), "members.monthly_income", id),
            });
        }
        Ok(out)
    }

    pub fn goals(&self, owner: &str) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target, current, category, image FROM goals WHERE owner_id=?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, Option<String>>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, Option<String>>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, target, current, category, image) = row?;
            out.push(Goal {
                id,
                name,
                target: amount_or_zero(target.as_deref(), "goals.target", id),
                current: amount_or_zero(current.as_deref(), "goals.current", id),
                category,
                image: image.filter(|s| !s.is_empty()),
            });
        }
        Ok(out)
    }

    pub fn bills(&self, owner: &str) -> Result<Vec<Bill>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, value, due_date, status, account_id FROM bills
             WHERE owner_id=?1 ORDER BY due_date ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, Option<i64>>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, description, value, due_date, status, account_id) = row?;
            out.push(Bill {
                id,
                description,
                value: amount_or_zero(value.as_deref(), "bills.value", id),
                due_date: parse_date(&due_date).with_context(|| format!("Bill {} due date", id))?,
                status: status
                    .parse::<Status>()
                    .with_context(|| format!("Bill {}", id))?,
                account_id,
            });
        }
        Ok(out)
    }
}

impl FinanceRepository for SqliteRepository<'_> {
    fn load_snapshot(&self, owner: &str) -> Result<Snapshot> {
        let snap = Snapshot {
            transactions: self.transactions(owner)?,
            accounts: self.accounts(owner)?,
            cards: self.cards(owner)?,
            members: self.members(owner)?,
            goals: self.goals(owner)?,
            bills: self.bills(owner)?,
        };
        log::debug!(
            "loaded snapshot for '{}': {} transactions, {} accounts, {} cards, {} members, {} goals, {} bills",
            owner,
            snap.transactions.len(),
            snap.accounts.len(),
            snap.cards.len(),
            snap.members.len(),
            snap.goals.len(),
            snap.bills.len()
        );
        Ok(snap)
    }

    fn add_transaction(&self, owner: &str, tx: NewTransaction) -> Result<Transaction> {
        if let Some(i) = tx.installments {
            Installments::new(i.current, i.total)?;
        }
        let (account_id, card_id) = match tx.posting {
            Some(Posting::Account(a)) => (Some(a), None),
            Some(Posting::Card(c)) => (None, Some(c)),
            None => (None, None),
        };
        self.conn.execute(
            "INSERT INTO transactions(owner_id, type, value, description, category, date,
                 account_id, card_id, member_id, installments_current, installments_total, status)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                owner,
                tx.r#type.as_str(),
                tx.value.to_string(),
                tx.description,
                tx.category,
                tx.date.to_string(),
                account_id,
                card_id,
                tx.member_id,
                tx.installments.map(|i| i.current),
                tx.installments.map(|i| i.total),
                tx.status.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("inserted transaction {} for '{}'", id, owner);
        Ok(Transaction {
            id,
            r#type: tx.r#type,
            value: tx.value,
            description: tx.description,
            category: tx.category,
            date: tx.date,
            posting: tx.posting,
            member_id: tx.member_id,
            installments: tx.installments,
            status: tx.status,
        })
    }

    fn add_account(&self, owner: &str, account: NewAccount) -> Result<Account> {
        self.conn.execute(
            "INSERT INTO accounts(owner_id, name, type, balance) VALUES (?1,?2,?3,?4)",
            params![owner, account.name, account.r#type.as_str(), account.balance.to_string()],
        )?;
        Ok(Account {
            id: self.conn.last_insert_rowid(),
            name: account.name,
            r#type: account.r#type,
            balance: account.balance,
        })
    }

    fn add_card(&self, owner: &str, card: NewCard) -> Result<Card> {
        self.conn.execute(
            "INSERT INTO cards(owner_id, name, closing_day, due_day, limit_amount, balance, theme, logo, last_digits)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                owner,
                card.name,
                card.closing_day,
                card.due_day,
                card.limit.to_string(),
                card.balance.to_string(),
                card.theme.as_str(),
                card.logo,
                card.last_digits,
            ],
        )?;
        Ok(Card {
            id: self.conn.last_insert_rowid(),
            name: card.name,
            closing_day: card.closing_day,
            due_day: card.due_day,
            limit: card.limit,
            balance: card.balance,
            theme: card.theme,
            logo: card.logo,
            last_digits: card.last_digits,
        })
    }

    fn add_member(&self, owner: &str, member: NewMember) -> Result<Member> {
        self.conn.execute(
            "INSERT INTO members(owner_id, name, role, avatar, monthly_income) VALUES (?1,?2,?3,?4,?5)",
            params![
                owner,
                member.name,
                member.role,
                member.avatar,
                member.monthly_income.to_string()
            ],
        )?;
        Ok(Member {
            id: self.conn.last_insert_rowid(),
            name: member.name,
            role: member.role,
            avatar: member.avatar,
            monthly_income: member.monthly_income,
        })
    }

    fn add_goal(&self, owner: &str, goal: NewGoal) -> Result<Goal> {
        self.conn.execute(
            "INSERT INTO goals(owner_id, name, target, current, category, image) VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                owner,
                goal.name,
                goal.target.to_string(),
                goal.current.to_string(),
                goal.category,
                goal.image
            ],
        )?;
        Ok(Goal {
            id: self.conn.last_insert_rowid(),
            name: goal.name,
            target: goal.target,
            current: goal.current,
            category: goal.category,
            image: goal.image,
        })
    }

    fn add_bill(&self, owner: &str, bill: NewBill) -> Result<Bill> {
        self.conn.execute(
            "INSERT INTO bills(owner_id, description, value, due_date, status, account_id)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                owner,
                bill.description,
                bill.value.to_string(),
                bill.due_date.to_string(),
                bill.status.as_str(),
                bill.account_id
            ],
        )?;
        Ok(Bill {
            id: self.conn.last_insert_rowid(),
            description: bill.description,
            value: bill.value,
            due_date: bill.due_date,
            status: bill.status,
            account_id: bill.account_id,
        })
    }

    fn update_bill_status(&self, owner: &str, bill_id: i64, status: Status) -> Result<()> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM bills WHERE id=?1 AND owner_id=?2",
                params![bill_id, owner],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(FinanceError::BillNotFound(bill_id).into());
        }
        self.conn.execute(
            "UPDATE bills SET status=?1 WHERE id=?2 AND owner_id=?3",
            params![status.as_str(), bill_id, owner],
        )?;
        log::debug!("bill {} marked {}", bill_id, status);
        Ok(())
    }
}
