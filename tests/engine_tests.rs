// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use hearthbook::engine::{
    balance_growth, category_breakdown, compute_stats, filter_transactions, matches,
    monthly_flow, period_expense, period_income, period_total, savings_rate, total_balance,
};
use hearthbook::models::{
    Account, AccountKind, Card, CardTheme, DateRange, Filters, Status, Transaction,
    TransactionType, TypeFilter,
};
use hearthbook::snapshot::Snapshot;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn tx(id: i64, r#type: TransactionType, value: i64, description: &str, category: &str, on: NaiveDate) -> Transaction {
    Transaction {
        id,
        r#type,
        value: dec(value),
        description: description.to_string(),
        category: category.to_string(),
        date: on,
        posting: None,
        member_id: None,
        installments: None,
        status: Status::Paid,
    }
}

fn account(id: i64, balance: i64) -> Account {
    Account {
        id,
        name: format!("acct{}", id),
        r#type: AccountKind::Checking,
        balance: dec(balance),
    }
}

fn card(id: i64, balance: i64) -> Card {
    Card {
        id,
        name: format!("card{}", id),
        closing_day: 1,
        due_day: 10,
        limit: dec(5000),
        balance: dec(balance),
        theme: CardTheme::Lime,
        logo: None,
        last_digits: "0001".into(),
    }
}

fn january() -> DateRange {
    DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap()
}

fn scenario() -> Vec<Transaction> {
    vec![
        tx(1, TransactionType::Income, 1000, "Pagamento", "Salário", date(2024, 1, 10)),
        tx(2, TransactionType::Expense, 400, "Mercado", "Alimentação", date(2024, 1, 15)),
        tx(3, TransactionType::Expense, 200, "Ônibus", "Transporte", date(2024, 1, 20)),
    ]
}

#[test]
fn total_balance_is_linear() {
    let a = vec![account(1, 1500), account(2, -200)];
    let b = vec![account(3, 700)];
    let c = vec![card(1, 300)];
    let d = vec![card(2, 450), card(3, 50)];

    assert_eq!(total_balance(&[], &[]), Decimal::ZERO);

    let all_accounts: Vec<_> = a.iter().chain(b.iter()).cloned().collect();
    let all_cards: Vec<_> = c.iter().chain(d.iter()).cloned().collect();
    let combined = total_balance(&all_accounts, &all_cards);
    let split = total_balance(&a, &c) + total_balance(&b, &d);
    assert_eq!(combined, split);
    assert_eq!(combined, dec(1500 - 200 + 700 - 300 - 450 - 50));
}

#[test]
fn savings_rate_is_zero_without_income() {
    for expense in [0, 1, 250, 10_000] {
        assert_eq!(savings_rate(Decimal::ZERO, dec(expense)), Decimal::ZERO);
    }
}

#[test]
fn savings_rate_values() {
    assert_eq!(savings_rate(dec(1000), dec(600)), dec(40));
    assert_eq!(savings_rate(dec(1000), dec(1200)), dec(-20));
}

#[test]
fn filter_requires_every_active_condition() {
    let mut t = tx(7, TransactionType::Expense, 50, "Farmácia Central", "Saúde", date(2024, 1, 12));
    t.member_id = Some(3);
    let f = Filters {
        search: "FARM".into(),
        r#type: TypeFilter::Expense,
        member_id: Some(3),
        date_range: Some(january()),
    };
    assert!(matches(&t, &f));

    let mut wrong_search = f.clone();
    wrong_search.search = "padaria".into();
    assert!(!matches(&t, &wrong_search));

    let mut wrong_type = f.clone();
    wrong_type.r#type = TypeFilter::Income;
    assert!(!matches(&t, &wrong_type));

    let mut wrong_member = f.clone();
    wrong_member.member_id = Some(4);
    assert!(!matches(&t, &wrong_member));

    let mut wrong_dates = f.clone();
    wrong_dates.date_range = Some(DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap());
    assert!(!matches(&t, &wrong_dates));

    let mut no_member = t.clone();
    no_member.member_id = None;
    assert!(!matches(&no_member, &f));
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let f = Filters {
        date_range: Some(january()),
        ..Filters::default()
    };
    let first = tx(1, TransactionType::Income, 1, "a", "x", date(2024, 1, 1));
    let last = tx(2, TransactionType::Income, 1, "b", "x", date(2024, 1, 31));
    let after = tx(3, TransactionType::Income, 1, "c", "x", date(2024, 2, 1));
    assert!(matches(&first, &f));
    assert!(matches(&last, &f));
    assert!(!matches(&after, &f));
}

#[test]
fn search_matches_category_case_insensitively() {
    let txs = scenario();
    let f = Filters {
        search: "sal".into(),
        date_range: Some(january()),
        ..Filters::default()
    };
    let hits = filter_transactions(&txs, &f);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, "Salário");
}

#[test]
fn breakdown_percentage_can_exceed_hundred() {
    let txs = vec![tx(1, TransactionType::Expense, 150, "Aluguel", "Casa", date(2024, 1, 5))];
    let shares = category_breakdown(&txs, dec(100), &Filters::default());
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].percentage, dec(150));
}

#[test]
fn breakdown_stays_within_income_when_spending_does() {
    let txs = scenario();
    let f = Filters {
        date_range: Some(january()),
        ..Filters::default()
    };
    let income = period_income(&txs, &f);
    let total: Decimal = category_breakdown(&txs, income, &f)
        .iter()
        .map(|s| s.percentage)
        .sum();
    assert!(total <= dec(100));
}

#[test]
fn breakdown_sorted_by_value_descending() {
    let on = date(2024, 1, 3);
    let txs = vec![
        tx(1, TransactionType::Expense, 100, "b1", "A", on),
        tx(2, TransactionType::Expense, 100, "b2", "B", on),
        tx(3, TransactionType::Expense, 200, "c", "C", on),
        tx(4, TransactionType::Expense, 200, "a2", "A", on),
        tx(5, TransactionType::Income, 999, "ignored", "A", on),
    ];
    let shares = category_breakdown(&txs, Decimal::ZERO, &Filters::default());
    let order: Vec<_> = shares.iter().map(|s| (s.category.as_str(), s.value)).collect();
    assert_eq!(order, vec![("A", dec(300)), ("C", dec(200)), ("B", dec(100))]);
    assert!(shares.iter().all(|s| s.percentage.is_zero()));
}

#[test]
fn breakdown_groups_exact_category_strings() {
    let on = date(2024, 1, 3);
    let txs = vec![
        tx(1, TransactionType::Expense, 10, "x", "Lazer", on),
        tx(2, TransactionType::Expense, 20, "y", "lazer", on),
    ];
    let shares = category_breakdown(&txs, dec(100), &Filters::default());
    assert_eq!(shares.len(), 2);
}

#[test]
fn dashboard_scenario() {
    let snap = Snapshot {
        transactions: scenario(),
        ..Snapshot::default()
    };
    let f = Filters {
        search: String::new(),
        r#type: TypeFilter::All,
        member_id: None,
        date_range: Some(january()),
    };
    let stats = compute_stats(&snap, &f);
    assert_eq!(stats.monthly_income, dec(1000));
    assert_eq!(stats.monthly_expense, dec(600));
    assert_eq!(stats.savings_rate, dec(40));
    assert_eq!(stats.category_breakdown.len(), 2);
    assert_eq!(stats.category_breakdown[0].category, "Alimentação");
    assert_eq!(stats.category_breakdown[0].value, dec(400));
    assert_eq!(stats.category_breakdown[0].percentage, dec(40));
    assert_eq!(stats.category_breakdown[1].category, "Transporte");
    assert_eq!(stats.category_breakdown[1].value, dec(200));
    assert_eq!(stats.category_breakdown[1].percentage, dec(20));
}

#[test]
fn income_and_expense_totals_ignore_type_selector() {
    let txs = scenario();
    let f = Filters {
        r#type: TypeFilter::Expense,
        date_range: Some(january()),
        ..Filters::default()
    };
    assert_eq!(period_income(&txs, &f), dec(1000));
    assert_eq!(period_total(&txs, TransactionType::Expense, &f), dec(600));
    assert_eq!(filter_transactions(&txs, &f).len(), 2);
}

#[test]
fn empty_inputs_give_zero_and_repeat_identically() {
    let f = Filters {
        search: "x".into(),
        date_range: Some(january()),
        ..Filters::default()
    };
    assert_eq!(period_income(&[], &f), Decimal::ZERO);
    assert_eq!(period_expense(&[], &f), Decimal::ZERO);
    assert!(category_breakdown(&[], Decimal::ZERO, &f).is_empty());
    assert_eq!(total_balance(&[], &[]), Decimal::ZERO);
    assert_eq!(savings_rate(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);

    let snap = Snapshot {
        transactions: scenario(),
        accounts: vec![account(1, 2500)],
        cards: vec![card(1, 300)],
        ..Snapshot::default()
    };
    let f = Filters {
        date_range: Some(january()),
        ..Filters::default()
    };
    assert_eq!(compute_stats(&snap, &f), compute_stats(&snap, &f));
}

#[test]
fn balance_growth_rules() {
    assert_eq!(balance_growth(dec(500), Decimal::ZERO), dec(100));
    assert_eq!(balance_growth(dec(-5), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(balance_growth(dec(150), dec(100)), dec(50));
    assert_eq!(balance_growth(dec(-50), dec(-100)), dec(50));
}

#[test]
fn growth_compares_against_balance_before_range() {
    // 2200 now; the January net of +400 means 1800 before the range
    let snap = Snapshot {
        transactions: scenario(),
        accounts: vec![account(1, 2500)],
        cards: vec![card(1, 300)],
        ..Snapshot::default()
    };
    let with_range = Filters {
        date_range: Some(january()),
        ..Filters::default()
    };
    let stats = compute_stats(&snap, &with_range);
    assert_eq!(stats.total_balance, dec(2200));
    assert_eq!(stats.balance_growth, (dec(400) / dec(1800)) * dec(100));

    let stats = compute_stats(&snap, &Filters::default());
    assert_eq!(stats.balance_growth, Decimal::ZERO);
}

fn huge() -> Decimal {
    "100000000000000000000000".parse().unwrap()
}

#[test]
fn oversized_amounts_saturate_instead_of_panicking() {
    let tiny = Decimal::new(1, 6);
    assert_eq!(savings_rate(tiny, huge()), Decimal::MIN);

    let mut big = tx(1, TransactionType::Expense, 0, "Casa", "Imóvel", date(2024, 1, 5));
    big.value = huge();
    let shares = category_breakdown(&[big], tiny, &Filters::default());
    assert_eq!(shares[0].percentage, Decimal::MAX);

    let mut top = tx(1, TransactionType::Expense, 0, "a", "x", date(2024, 1, 5));
    top.value = Decimal::MAX;
    let one = tx(2, TransactionType::Expense, 1, "b", "x", date(2024, 1, 6));
    assert_eq!(period_expense(&[top, one], &Filters::default()), Decimal::MAX);

    let mut acct = account(1, 0);
    acct.balance = Decimal::MAX;
    let mut owed = card(1, 0);
    owed.balance = Decimal::MIN;
    assert_eq!(total_balance(&[acct], &[owed]), Decimal::MAX);
    assert_eq!(balance_growth(huge(), tiny), Decimal::MAX);
}

#[test]
fn monthly_flow_buckets_by_calendar_month() {
    let txs = vec![
        tx(1, TransactionType::Income, 1000, "Pagamento", "Salário", date(2024, 3, 1)),
        tx(2, TransactionType::Expense, 300, "Mercado", "Alimentação", date(2024, 3, 31)),
        tx(3, TransactionType::Expense, 50, "Padaria", "Alimentação", date(2024, 2, 29)),
        tx(4, TransactionType::Income, 70, "Venda", "Extra", date(2024, 4, 1)),
        tx(5, TransactionType::Expense, 999, "Antigo", "Casa", date(2023, 12, 31)),
    ];
    let flow = monthly_flow(&txs, date(2024, 3, 15), 3);
    let months: Vec<_> = flow.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(flow[0].income, Decimal::ZERO);
    assert_eq!(flow[0].expense, Decimal::ZERO);
    assert_eq!(flow[1].expense, dec(50));
    assert_eq!(flow[2].income, dec(1000));
    assert_eq!(flow[2].expense, dec(300));
}

#[test]
fn monthly_flow_rolls_back_across_year_end() {
    let txs = vec![
        tx(1, TransactionType::Expense, 120, "Presentes", "Lazer", date(2023, 12, 24)),
        tx(2, TransactionType::Income, 800, "Bônus", "Salário", date(2023, 8, 1)),
        tx(3, TransactionType::Income, 500, "Antes", "Salário", date(2023, 7, 31)),
    ];
    let flow = monthly_flow(&txs, date(2024, 2, 29), 7);
    let months: Vec<_> = flow.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-08", "2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
    );
    assert_eq!(flow[0].income, dec(800));
    assert_eq!(flow[4].expense, dec(120));
    assert!(monthly_flow(&txs, date(2024, 2, 29), 0).is_empty());
}
