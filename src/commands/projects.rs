// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DeliveryLevel;
use crate::pricing::parse_decimal_or_default;
use crate::utils::{id_for_client, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-status", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let status = sub.get_one::<String>("status").unwrap();
            let n = conn.execute(
                "UPDATE projects SET status=?1 WHERE name=?2",
                params![status, name],
            )?;
            if n == 0 {
                anyhow::bail!("Project '{}' not found", name);
            }
            println!("Project '{}' is now '{}'", name, status);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM projects WHERE name=?1", params![name])?;
            println!("Removed project '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let client = sub.get_one::<String>("client").unwrap();
    // Area is optional at creation time; blank or absent prices the m² rate at 0.
    let area = parse_decimal_or_default(
        sub.get_one::<String>("area").map(String::as_str).unwrap_or(""),
        Decimal::ZERO,
    );
    let level = match sub.get_one::<String>("level") {
        Some(s) => DeliveryLevel::from_str(s)?,
        None => DeliveryLevel::Basico,
    };
    let client_id = id_for_client(conn, client)?;
    conn.execute(
        "INSERT INTO projects(name, client_id, area, delivery_level) VALUES (?1, ?2, ?3, ?4)",
        params![name, client_id, area.to_string(), level.to_string()],
    )?;
    println!("Added project '{}' for client '{}'", name, client);
    Ok(())
}

#[derive(Serialize)]
pub struct ProjectRow {
    pub name: String,
    pub client: String,
    pub status: String,
    pub area: String,
    pub delivery_level: String,
    pub created_at: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<ProjectRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.name, c.name, p.status, p.area, p.delivery_level, p.created_at
         FROM projects p JOIN clients c ON p.client_id=c.id ORDER BY p.name",
    )?;
    let mut cur = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        data.push(ProjectRow {
            name: r.get(0)?,
            client: r.get(1)?,
            status: r.get(2)?,
            area: r.get(3)?,
            delivery_level: r.get(4)?,
            created_at: r.get(5)?,
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
                    r.client.clone(),
                    r.status.clone(),
                    r.area.clone(),
                    r.delivery_level.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Project", "Client", "Status", "Area (m²)", "Level"], rows)
        );
    }
    Ok(())
}
