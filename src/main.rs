// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use hearthbook::{cli, commands, config::Config, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_path = Config::db_path_from(&matches)?;
    let conn = db::open_or_init(&db_path)?;
    let cfg = Config::resolve(&conn, db_path, &matches)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("settings", sub)) => commands::settings::handle(&conn, &cfg, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, &cfg, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, &cfg, sub)?,
        Some(("member", sub)) => commands::members::handle(&conn, &cfg, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, &cfg, sub)?,
        Some(("bill", sub)) => commands::bills::handle(&conn, &cfg, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &cfg, sub)?,
        Some(("stats", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        Some(("flow", sub)) => commands::reports::handle_flow(&conn, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &cfg, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &cfg)?,
        Some(("watch", sub)) => commands::watch::handle(&conn, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
