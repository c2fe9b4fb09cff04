// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{arg, command, value_parser, ArgAction, Command};

use crate::config::{DB_ENV, OWNER_ENV};
use crate::models::{DateRange, Filters, TypeFilter};
use crate::utils::{month_bounds, parse_date, parse_month};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue))
}

/// The view options shared by `tx list`, `stats`, `export` and `watch`.
fn filter_args(cmd: Command) -> Command {
    cmd.arg(arg!(--search <TEXT> "Case-insensitive match on description or category"))
        .arg(arg!(--"type" <TYPE> "all | income | expense").default_value("all"))
        .arg(arg!(--member <ID> "Only transactions attributed to this member"))
        .arg(arg!(--from <DATE> "Range start, YYYY-MM-DD (inclusive)"))
        .arg(arg!(--to <DATE> "Range end, YYYY-MM-DD (inclusive)"))
        .arg(arg!(--month <MONTH> "Whole month, YYYY-MM").conflicts_with_all(["from", "to"]))
        .arg(
            arg!(--"all-dates" "Do not restrict by date")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["from", "to", "month"]),
        )
}

pub fn build_cli() -> Command {
    command!()
        .name("hearthbook")
        .about("Family finance dashboard: balances, cards, goals, bills and spending")
        .arg(arg!(--db <PATH> "SQLite database file").env(DB_ENV).global(true))
        .arg(arg!(--owner <OWNER> "Owner whose data is shown").env(OWNER_ENV).global(true))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("settings")
                .about("Stored settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-owner").arg(arg!(<ID> "Default owner id"))),
        )
        .subcommand(
            Command::new("account")
                .about("Bank accounts")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--"type" <TYPE> "checking | savings | card").default_value("checking"))
                        .arg(arg!(--balance <AMOUNT>).default_value("0")),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--"closing-day" <DAY>).required(true).value_parser(value_parser!(u32)))
                        .arg(arg!(--"due-day" <DAY>).required(true).value_parser(value_parser!(u32)))
                        .arg(arg!(--limit <AMOUNT>).required(true))
                        .arg(arg!(--balance <AMOUNT>).default_value("0"))
                        .arg(arg!(--theme <THEME> "black | lime | white").default_value("black"))
                        .arg(arg!(--"last-digits" <DIGITS>).required(true))
                        .arg(arg!(--logo <URI>)),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("member")
                .about("Family members")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--role <ROLE>).default_value(""))
                        .arg(arg!(--income <AMOUNT> "Monthly income").default_value("0"))
                        .arg(arg!(--avatar <URI>)),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--target <AMOUNT>).required(true))
                        .arg(arg!(--current <AMOUNT>).default_value("0"))
                        .arg(arg!(--category <CATEGORY>).default_value(""))
                        .arg(arg!(--image <URI>)),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("bill")
                .about("Bills and due dates")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--description <TEXT>).required(true))
                        .arg(arg!(--value <AMOUNT>).required(true))
                        .arg(arg!(--due <DATE>).required(true))
                        .arg(arg!(--status <STATUS> "paid | pending").default_value("pending"))
                        .arg(arg!(--account <ID>)),
                )
                .subcommand(output_flags(
                    Command::new("list")
                        .arg(arg!(--pending "Only unpaid bills").action(ArgAction::SetTrue)),
                ))
                .subcommand(Command::new("pay").arg(arg!(--id <ID>).required(true)))
                .subcommand(Command::new("unpay").arg(arg!(--id <ID>).required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--"type" <TYPE> "income | expense").required(true))
                        .arg(arg!(--value <AMOUNT>).required(true))
                        .arg(arg!(--description <TEXT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--date <DATE>).required(true))
                        .arg(arg!(--account <ID>).conflicts_with("card"))
                        .arg(arg!(--card <ID>))
                        .arg(arg!(--member <ID>))
                        .arg(
                            arg!(--installments <N> "Installment plan of N parts (records 1/N)")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--status <STATUS> "paid | pending").default_value("paid")),
                )
                .subcommand(output_flags(filter_args(
                    Command::new("list")
                        .arg(arg!(--limit <N>).value_parser(value_parser!(usize))),
                ))),
        )
        .subcommand(output_flags(filter_args(
            Command::new("stats").about("Balance, income, expense, savings rate and breakdown"),
        )))
        .subcommand(output_flags(
            Command::new("flow")
                .about("Income and expense per month, ending with the current month")
                .arg(
                    arg!(--months <N> "How many months to show")
                        .value_parser(value_parser!(u32))
                        .default_value("7"),
                ),
        ))
        .subcommand(
            Command::new("export").about("Export data").subcommand(filter_args(
                Command::new("transactions")
                    .arg(arg!(--format <FMT> "csv | json").default_value("csv"))
                    .arg(arg!(--out <PATH>).required(true)),
            )),
        )
        .subcommand(Command::new("doctor").about("Check data for inconsistencies"))
        .subcommand(filter_args(
            Command::new("watch")
                .about("Print stats whenever the data changes")
                .arg(
                    arg!(--"interval-ms" <MS>)
                        .value_parser(value_parser!(u64))
                        .default_value("1000"),
                ),
        ))
}

pub fn parse_id(raw: &str, what: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid {} id '{}'", what, raw))
}

/// Build the active view from parsed arguments. Without any date flag the
/// view covers the month containing `today`.
pub fn filters_from(sub: &clap::ArgMatches, today: NaiveDate) -> Result<Filters> {
    let search = sub
        .get_one::<String>("search")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let r#type = match sub.get_one::<String>("type") {
        Some(t) => t.parse::<TypeFilter>()?,
        None => TypeFilter::All,
    };
    let member_id = sub
        .get_one::<String>("member")
        .map(|m| parse_id(m, "member"))
        .transpose()?;

    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let date_range = if sub.get_flag("all-dates") {
        None
    } else if let Some(month) = sub.get_one::<String>("month") {
        Some(parse_month(month)?)
    } else {
        match (from, to) {
            (None, None) => Some(month_bounds(today)),
            (Some(f), Some(t)) => Some(DateRange::new(f, t)?),
            (Some(f), None) => Some(DateRange::new(f, NaiveDate::MAX)?),
            (None, Some(t)) => Some(DateRange::new(NaiveDate::MIN, t)?),
        }
    };

    Ok(Filters {
        search,
        r#type,
        member_id,
        date_range,
    })
}
