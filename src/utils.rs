// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{CostItem, OfficeCost};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_client(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM clients WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Client '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_project(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM projects WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Project '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_collaborator(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM collaborators WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Collaborator '{}' not found", name))?;
    Ok(id)
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency")?.unwrap_or_else(|| "BRL".to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    set_setting(conn, "currency", ccy)
}

/// Contingency percentage stacked on the office cost total. Defaults to 15.
pub fn get_reserve_pct(conn: &Connection) -> Result<Decimal> {
    match get_setting(conn, "office.technical_reserve_pct")? {
        Some(s) => parse_decimal(&s),
        None => Ok(Decimal::new(15, 0)),
    }
}

pub fn set_reserve_pct(conn: &Connection, pct: Decimal) -> Result<()> {
    set_setting(conn, "office.technical_reserve_pct", &pct.to_string())
}

/// Monthly billable-hour capacity the overhead total is divided by.
/// Defaults to 168 (21 days at 8h).
pub fn get_productive_hours(conn: &Connection) -> Result<Decimal> {
    match get_setting(conn, "office.productive_hours")? {
        Some(s) => parse_decimal(&s),
        None => Ok(Decimal::new(168, 0)),
    }
}

pub fn set_productive_hours(conn: &Connection, hours: Decimal) -> Result<()> {
    set_setting(conn, "office.productive_hours", &hours.to_string())
}

/// Assemble the full office overhead input from the ledger and settings.
pub fn load_office_cost(conn: &Connection) -> Result<OfficeCost> {
    let mut stmt =
        conn.prepare("SELECT kind, name, value FROM office_costs ORDER BY id")?;
    let mut rows = stmt.query([])?;
    let mut fixed_costs = Vec::new();
    let mut variable_costs = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(0)?;
        let name: String = r.get(1)?;
        let value_s: String = r.get(2)?;
        let value = value_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid cost value '{}' for '{}'", value_s, name))?;
        let item = CostItem { name, value };
        if kind == "fixed" {
            fixed_costs.push(item);
        } else {
            variable_costs.push(item);
        }
    }
    Ok(OfficeCost {
        fixed_costs,
        variable_costs,
        technical_reserve_pct: get_reserve_pct(conn)?,
        productive_hours_per_month: get_productive_hours(conn)?,
    })
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
