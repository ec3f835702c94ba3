// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("budgets", sub)) => export_budgets(conn, sub),
        Some(("clients", sub)) => export_clients(conn, sub),
        _ => Ok(()),
    }
}

fn check_format(fmt: &str) -> Result<()> {
    if fmt != "csv" && fmt != "json" {
        anyhow::bail!("Unknown format: {} (use csv|json)", fmt);
    }
    Ok(())
}

fn export_budgets(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    check_format(&fmt)?;

    let mut stmt = conn.prepare(
        "SELECT b.id, p.name AS project, c.name AS client, b.area, b.delivery_level, b.status,
                r.final_value, r.discount_value, r.final_value_with_discount,
                r.hourly_rate, r.sq_meter_rate
         FROM budgets b
         JOIN projects p ON b.project_id=p.id
         JOIN clients c ON p.client_id=c.id
         LEFT JOIN budget_results r ON r.budget_id=b.id
         ORDER BY b.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, Option<String>>(9)?,
            r.get::<_, Option<String>>(10)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "project",
                "client",
                "area",
                "delivery_level",
                "status",
                "final_value",
                "discount_value",
                "final_value_with_discount",
                "hourly_rate",
                "sq_meter_rate",
            ])?;
            for row in rows {
                let (id, proj, cli, area, level, status, fv, dv, fvd, hr, sqm) = row?;
                wtr.write_record([
                    id.to_string(),
                    proj,
                    cli,
                    area,
                    level,
                    status,
                    fv.unwrap_or_default(),
                    dv.unwrap_or_default(),
                    fvd.unwrap_or_default(),
                    hr.unwrap_or_default(),
                    sqm.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let mut items = Vec::new();
            for row in rows {
                let (id, proj, cli, area, level, status, fv, dv, fvd, hr, sqm) = row?;
                items.push(json!({
                    "id": id, "project": proj, "client": cli, "area": area,
                    "delivery_level": level, "status": status,
                    "final_value": fv, "discount_value": dv,
                    "final_value_with_discount": fvd,
                    "hourly_rate": hr, "sq_meter_rate": sqm
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported budgets to {}", out);
    Ok(())
}

fn export_clients(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    check_format(&fmt)?;

    let data = crate::commands::clients::query_rows(conn)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["name", "email", "phone", "city", "note", "created_at"])?;
            for r in &data {
                wtr.write_record([
                    r.name.clone(),
                    r.email.clone(),
                    r.phone.clone(),
                    r.city.clone(),
                    r.note.clone(),
                    r.created_at.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
        }
    }
    println!("Exported clients to {}", out);
    Ok(())
}
