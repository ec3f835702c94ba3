// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::pricing::office_breakdown;
use crate::utils::{
    fmt_money, get_currency, load_office_cost, maybe_print_json, parse_decimal, pretty_table,
    set_productive_hours, set_reserve_pct,
};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("rm", sub)) => {
            let kind = sub.get_one::<String>("kind").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute(
                "DELETE FROM office_costs WHERE kind=?1 AND name=?2",
                params![kind, name],
            )?;
            println!("Removed {} {} cost line(s) named '{}'", n, kind, name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-reserve", sub)) => {
            let pct = parse_decimal(sub.get_one::<String>("pct").unwrap())?;
            set_reserve_pct(conn, pct)?;
            println!("Technical reserve set to {}%", pct);
        }
        Some(("set-hours", sub)) => {
            let hours = parse_decimal(sub.get_one::<String>("hours").unwrap())?;
            set_productive_hours(conn, hours)?;
            println!("Productive hours per month set to {}", hours);
        }
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub.get_one::<String>("kind").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let value = parse_decimal(sub.get_one::<String>("value").unwrap())?;
    let allow_duplicate = sub.get_flag("allow-duplicate");

    // The ledger permits duplicate names; adding one is almost always a typo,
    // so it takes an explicit flag to keep both.
    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM office_costs WHERE kind=?1 AND name=?2",
        params![kind, name],
        |r| r.get(0),
    )?;
    if existing > 0 && !allow_duplicate {
        anyhow::bail!(
            "A {} cost named '{}' already exists; pass --allow-duplicate to keep both",
            kind,
            name
        );
    }

    conn.execute(
        "INSERT INTO office_costs(kind, name, value) VALUES (?1, ?2, ?3)",
        params![kind, name, value.to_string()],
    )?;
    println!("Added {} cost '{}' = {}", kind, name, value);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt =
        conn.prepare("SELECT kind, name, value FROM office_costs ORDER BY kind, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (k, n, v) = row?;
        data.push(vec![k, n, v]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Kind", "Name", "Value"], data));
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let office = load_office_cost(conn)?;
    let b = office_breakdown(&office);
    if maybe_print_json(json_flag, jsonl_flag, &b)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let money = |d: &rust_decimal::Decimal| fmt_money(d, &ccy);
    let rows = vec![
        vec!["Fixed costs".into(), money(&b.total_fixed)],
        vec!["Variable costs".into(), money(&b.total_variable)],
        vec!["Total costs".into(), money(&b.total_costs)],
        vec![
            format!("Technical reserve ({}%)", office.technical_reserve_pct),
            money(&b.reserve),
        ],
        vec!["Total with reserve".into(), money(&b.total_with_reserve)],
        vec![
            format!("Hourly cost ({}h)", office.productive_hours_per_month),
            money(&b.hourly_cost),
        ],
    ];
    println!("{}", pretty_table(&["Office overhead", "Value"], rows));
    Ok(())
}
