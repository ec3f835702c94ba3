// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email");
            let phone = sub.get_one::<String>("phone");
            let city = sub.get_one::<String>("city");
            let note = sub.get_one::<String>("note");
            conn.execute(
                "INSERT INTO clients(name, email, phone, city, note) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, email, phone, city, note],
            )?;
            println!("Added client '{}'", name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM clients WHERE name=?1", params![name])?;
            println!("Removed client '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ClientRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub note: String,
    pub created_at: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<ClientRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, email, phone, city, note, created_at FROM clients ORDER BY name",
    )?;
    let mut cur = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        let name: String = r.get(0)?;
        let email: Option<String> = r.get(1)?;
        let phone: Option<String> = r.get(2)?;
        let city: Option<String> = r.get(3)?;
        let note: Option<String> = r.get(4)?;
        let created_at: String = r.get(5)?;
        data.push(ClientRow {
            name,
            email: email.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            city: city.unwrap_or_default(),
            note: note.unwrap_or_default(),
            created_at,
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
                    r.email.clone(),
                    r.phone.clone(),
                    r.city.clone(),
                    r.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Email", "Phone", "City", "Created"], rows)
        );
    }
    Ok(())
}
