// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("done", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute(
                "UPDATE onboarding_tasks SET done=1, done_at=datetime('now') WHERE name=?1",
                params![name],
            )?;
            if n == 0 {
                anyhow::bail!("No checklist task named '{}'", name);
            }
            let (done, total) = progress(conn)?;
            println!("Done: '{}' ({}/{} complete)", name, done, total);
        }
        _ => {}
    }
    Ok(())
}

/// Flat completion counter over the checklist rows.
pub fn progress(conn: &Connection) -> Result<(i64, i64)> {
    let (done, total): (i64, i64) = conn.query_row(
        "SELECT IFNULL(SUM(done),0), COUNT(*) FROM onboarding_tasks",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok((done, total))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare("SELECT name, done, done_at FROM onboarding_tasks ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, Option<String>>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, done, done_at) = row?;
        data.push(vec![
            name,
            if done != 0 { "yes".into() } else { "no".into() },
            done_at.unwrap_or_default(),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Task", "Done", "When"], data));
        let (done, total) = progress(conn)?;
        println!("{}/{} complete", done, total);
    }
    Ok(())
}
