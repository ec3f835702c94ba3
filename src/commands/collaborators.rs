// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::pricing::parse_decimal_or_default;
use crate::utils::{id_for_collaborator, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("occupancy", sub)) => occupancy(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM collaborators WHERE name=?1", params![name])?;
            println!("Removed collaborator '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let role = sub.get_one::<String>("role").unwrap();
    let rate = match sub.get_one::<String>("rate") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let hours_per_day = parse_decimal_or_default(
        sub.get_one::<String>("hours-per-day")
            .map(String::as_str)
            .unwrap_or(""),
        Decimal::new(8, 0),
    );
    let work_days: i64 = *sub.get_one::<i64>("work-days").unwrap_or(&20);
    conn.execute(
        "INSERT INTO collaborators(name, role, hourly_rate, hours_per_day, work_days)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            role,
            rate.to_string(),
            hours_per_day.to_string(),
            work_days
        ],
    )?;
    println!("Added collaborator '{}' ({})", name, role);
    Ok(())
}

#[derive(Serialize)]
pub struct CollaboratorRow {
    pub name: String,
    pub role: String,
    pub hourly_rate: String,
    pub hours_per_day: String,
    pub work_days: i64,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<CollaboratorRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, role, hourly_rate, hours_per_day, work_days
         FROM collaborators ORDER BY name",
    )?;
    let mut cur = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        data.push(CollaboratorRow {
            name: r.get(0)?,
            role: r.get(1)?,
            hourly_rate: r.get(2)?,
            hours_per_day: r.get(3)?,
            work_days: r.get(4)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.role.clone(),
                    r.hourly_rate.clone(),
                    r.hours_per_day.clone(),
                    r.work_days.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Role", "Rate", "Hours/day", "Days/month"], rows)
        );
    }
    Ok(())
}

/// Monthly capacity, assigned hours and occupancy for one collaborator.
/// Capacity is hours_per_day × work_days; assigned hours come from task
/// lines on budgets that are not closed. Occupancy is 0 when capacity is 0.
pub fn occupancy_compute(
    conn: &Connection,
    collaborator_id: i64,
) -> Result<(Decimal, Decimal, Decimal)> {
    let (hours_s, days): (String, i64) = conn.query_row(
        "SELECT hours_per_day, work_days FROM collaborators WHERE id=?1",
        params![collaborator_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    let hours_per_day = hours_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid hours_per_day '{}'", hours_s))?;
    let capacity = hours_per_day * Decimal::from(days);

    let mut stmt = conn.prepare(
        "SELECT t.hours FROM budget_tasks t
         JOIN budgets b ON t.budget_id=b.id
         WHERE t.collaborator_id=?1 AND b.status != 'closed'",
    )?;
    let mut cur = stmt.query(params![collaborator_id])?;
    let mut assigned = Decimal::ZERO;
    while let Some(r) = cur.next()? {
        let h: String = r.get(0)?;
        assigned += h
            .parse::<Decimal>()
            .with_context(|| format!("Invalid hours '{}' in budget_tasks", h))?;
    }

    let pct = if capacity.is_zero() {
        Decimal::ZERO
    } else {
        assigned * Decimal::ONE_HUNDRED / capacity
    };
    Ok((capacity, assigned, pct))
}

fn occupancy(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_collaborator(conn, name)?;
    let (capacity, assigned, pct) = occupancy_compute(conn, id)?;
    println!(
        "{}",
        pretty_table(
            &["Collaborator", "Capacity (h)", "Assigned (h)", "Occupancy %"],
            vec![vec![
                name.clone(),
                format!("{:.2}", capacity),
                format!("{:.2}", assigned),
                format!("{:.2}", pct),
            ]],
        )
    );
    Ok(())
}
