// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::collaborators::occupancy_compute;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pipeline", sub)) => pipeline(conn, sub)?,
        Some(("occupancy", sub)) => occupancy(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn pipeline(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT b.status, r.final_value_with_discount
         FROM budgets b LEFT JOIN budget_results r ON r.budget_id=b.id
         ORDER BY b.status",
    )?;
    let mut cur = stmt.query([])?;
    // status -> (count, calculated count, quoted total)
    let mut map: BTreeMap<String, (i64, i64, Decimal)> = BTreeMap::new();
    while let Some(r) = cur.next()? {
        let status: String = r.get(0)?;
        let quoted: Option<String> = r.get(1)?;
        let entry = map.entry(status).or_insert((0, 0, Decimal::ZERO));
        entry.0 += 1;
        if let Some(s) = quoted {
            let v = s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid stored final value '{}'", s))?;
            entry.1 += 1;
            entry.2 += v;
        }
    }
    let mut data = Vec::new();
    for (status, (count, calculated, total)) in &map {
        data.push(vec![
            status.clone(),
            count.to_string(),
            calculated.to_string(),
            format!("{:.2}", total),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Status", "Budgets", "Calculated", "Quoted total"], data)
        );
    }
    Ok(())
}

fn occupancy(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare("SELECT id, name, role FROM collaborators ORDER BY name")?;
    let collabs = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for c in collabs {
        let (id, name, role) = c?;
        let (capacity, assigned, pct) = occupancy_compute(conn, id)?;
        data.push(vec![
            name,
            role,
            format!("{:.2}", capacity),
            format!("{:.2}", assigned),
            format!("{:.2}", pct),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Collaborator", "Role", "Capacity (h)", "Assigned (h)", "Occupancy %"],
                data
            )
        );
    }
    Ok(())
}
