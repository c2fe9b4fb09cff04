// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use hearthbook::commands::{doctor, reports};
use hearthbook::repository::{FinanceRepository, SqliteRepository};
use hearthbook::{cli, db::init_schema};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id,owner_id,name,type,balance) VALUES (1,'casa','Conta','checking','2500');
        INSERT INTO cards(id,owner_id,name,closing_day,due_day,limit_amount,balance,theme,last_digits)
            VALUES (1,'casa','Nubank',3,10,'1000','300','black','4321');
        INSERT INTO transactions(owner_id,type,value,description,category,date,account_id,status)
            VALUES ('casa','income','1000','Pagamento','Salário','2024-01-10',1,'paid');
        INSERT INTO transactions(owner_id,type,value,description,category,date,card_id,status)
            VALUES ('casa','expense','400','Mercado','Alimentação','2024-01-15',1,'paid');
        INSERT INTO transactions(owner_id,type,value,description,category,date,account_id,status)
            VALUES ('casa','expense','200','Ônibus','Transporte','2024-01-20',1,'pending');
        "#,
    )
    .unwrap();
    conn
}

fn stats(conn: &Connection, args: &[&str]) -> hearthbook::models::FinanceStats {
    let mut argv = vec!["hearthbook", "stats"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    match matches.subcommand() {
        Some(("stats", sub)) => reports::stats_for(conn, "casa", sub, today).unwrap(),
        _ => panic!("no stats subcommand"),
    }
}

#[test]
fn stats_for_current_month() {
    let conn = setup();
    let s = stats(&conn, &[]);
    assert_eq!(s.total_balance, Decimal::from(2200));
    assert_eq!(s.monthly_income, Decimal::from(1000));
    assert_eq!(s.monthly_expense, Decimal::from(600));
    assert_eq!(s.savings_rate, Decimal::from(40));
    assert_eq!(s.category_breakdown[0].category, "Alimentação");
}

#[test]
fn stats_outside_activity_are_zero() {
    let conn = setup();
    let s = stats(&conn, &["--month", "2023-06"]);
    assert_eq!(s.monthly_income, Decimal::ZERO);
    assert_eq!(s.savings_rate, Decimal::ZERO);
    assert!(s.category_breakdown.is_empty());
    assert_eq!(s.balance_growth, Decimal::ZERO);
}

#[test]
fn render_lists_metrics_and_categories() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["hearthbook", "stats", "--month", "2024-01"]);
    let Some(("stats", sub)) = matches.subcommand() else {
        panic!("no stats subcommand");
    };
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let filters = cli::filters_from(sub, today).unwrap();
    let s = reports::stats_for(&conn, "casa", sub, today).unwrap();
    let out = reports::render(&s, &filters);
    assert!(out.contains("2024-01-01 .. 2024-01-31"));
    assert!(out.contains("40.0%"));
    assert!(out.contains("Transporte"));
}

#[test]
fn doctor_flags_dangling_references() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO cards(owner_id,name,closing_day,due_day,limit_amount,balance,theme,last_digits)
            VALUES ('casa','Velho',1,5,'100','150','white','12a4');
        INSERT INTO transactions(owner_id,type,value,description,category,date,account_id,member_id,status)
            VALUES ('casa','expense','10','x','y','2024-01-02',99,7,'paid');
        "#,
    )
    .unwrap();
    let snap = SqliteRepository::new(&conn).load_snapshot("casa").unwrap();
    let kinds: Vec<String> = doctor::find_issues(&snap).into_iter().map(|r| r[0].clone()).collect();
    assert!(kinds.contains(&"card_over_limit".to_string()));
    assert!(kinds.contains(&"card_bad_digits".to_string()));
    assert!(kinds.contains(&"txn_missing_account".to_string()));
    assert!(kinds.contains(&"txn_missing_member".to_string()));
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let conn = setup();
    let snap = SqliteRepository::new(&conn).load_snapshot("casa").unwrap();
    assert!(doctor::find_issues(&snap).is_empty());
}

#[test]
fn flow_lists_requested_months() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["hearthbook", "flow", "--months", "2"]);
    let Some(("flow", sub)) = matches.subcommand() else {
        panic!("no flow subcommand");
    };
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let flow = reports::flow_for(&conn, "casa", sub, today).unwrap();
    assert_eq!(flow.len(), 2);
    assert_eq!(flow[0].month, "2023-12");
    assert_eq!(flow[0].income, Decimal::ZERO);
    assert_eq!(flow[1].month, "2024-01");
    assert_eq!(flow[1].income, Decimal::from(1000));
    assert_eq!(flow[1].expense, Decimal::from(600));

    let defaults = cli::build_cli().get_matches_from(["hearthbook", "flow"]);
    let Some(("flow", sub)) = defaults.subcommand() else {
        panic!("no flow subcommand");
    };
    assert_eq!(reports::flow_for(&conn, "casa", sub, today).unwrap().len(), 7);
}
