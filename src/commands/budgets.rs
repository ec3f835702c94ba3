// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetAdjustment, BudgetExtraCost, BudgetResult, BudgetTask, DeliveryLevel};
use crate::pricing::{quote, QuoteInput};
use crate::utils::{
    fmt_money, get_currency, id_for_collaborator, id_for_project, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new(conn, sub)?,
        Some(("task", sub)) => match sub.subcommand() {
            Some(("add", sub)) => task_add(conn, sub)?,
            Some(("list", sub)) => task_list(conn, sub)?,
            _ => {}
        },
        Some(("extras", sub)) => extras_set(conn, sub)?,
        Some(("adjust", sub)) => adjust_set(conn, sub)?,
        Some(("calc", sub)) => calc(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-status", sub)) => {
            let id = *sub.get_one::<i64>("budget").unwrap();
            let status = sub.get_one::<String>("status").unwrap();
            let n = conn.execute(
                "UPDATE budgets SET status=?1 WHERE id=?2",
                params![status, id],
            )?;
            if n == 0 {
                anyhow::bail!("Budget {} not found", id);
            }
            println!("Budget {} is now '{}'", id, status);
        }
        _ => {}
    }
    Ok(())
}

fn new(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project = sub.get_one::<String>("project").unwrap();
    let project_id = id_for_project(conn, project)?;
    // Area and level default to the project's own values.
    let (proj_area, proj_level): (String, String) = conn.query_row(
        "SELECT area, delivery_level FROM projects WHERE id=?1",
        params![project_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    let area = match sub.get_one::<String>("area") {
        Some(s) => parse_decimal(s)?,
        None => parse_decimal(&proj_area)?,
    };
    let level = match sub.get_one::<String>("level") {
        Some(s) => DeliveryLevel::from_str(s)?,
        None => DeliveryLevel::from_str(&proj_level)?,
    };
    conn.execute(
        "INSERT INTO budgets(project_id, area, delivery_level) VALUES (?1, ?2, ?3)",
        params![project_id, area.to_string(), level.to_string()],
    )?;
    let id = conn.last_insert_rowid();
    println!("Created budget {} for project '{}'", id, project);
    Ok(())
}

fn budget_exists(conn: &Connection, id: i64) -> Result<()> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM budgets WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    if found.is_none() {
        anyhow::bail!("Budget {} not found", id);
    }
    Ok(())
}

fn task_add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    budget_exists(conn, budget_id)?;
    let desc = sub.get_one::<String>("desc").unwrap();
    let hours = parse_decimal(sub.get_one::<String>("hours").unwrap())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
    let collab_id = match sub.get_one::<String>("collab") {
        Some(name) => Some(id_for_collaborator(conn, name)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO budget_tasks(budget_id, description, hours, hourly_rate, collaborator_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            budget_id,
            desc,
            hours.to_string(),
            rate.to_string(),
            collab_id
        ],
    )?;
    println!("Added task '{}' ({}h at {}) to budget {}", desc, hours, rate, budget_id);
    Ok(())
}

fn task_list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    let tasks = load_tasks(conn, budget_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &tasks)? {
        let mut rows = Vec::new();
        for t in &tasks {
            let collab = match t.collaborator_id {
                Some(id) => conn.query_row(
                    "SELECT name FROM collaborators WHERE id=?1",
                    params![id],
                    |r| r.get::<_, String>(0),
                )?,
                None => String::new(),
            };
            rows.push(vec![
                t.description.clone(),
                t.hours.to_string(),
                t.hourly_rate.to_string(),
                collab,
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Task", "Hours", "Rate", "Collaborator"], rows)
        );
    }
    Ok(())
}

const EXTRA_COLUMNS: &[(&str, &str)] = &[
    ("technical-visit", "technical_visit"),
    ("transport", "transport"),
    ("printing", "printing"),
    ("fees", "fees"),
    ("other", "other"),
];

const ADJUST_COLUMNS: &[(&str, &str)] = &[
    ("complexity", "complexity_pct"),
    ("technical-reserve", "technical_reserve_pct"),
    ("client-difficulty", "client_difficulty_pct"),
    ("extras", "extras_pct"),
    ("profit", "profit_pct"),
    ("taxes", "taxes_pct"),
    ("card-fee", "card_fee_pct"),
    ("discount", "discount_pct"),
];

fn set_columns(
    conn: &Connection,
    sub: &clap::ArgMatches,
    budget_id: i64,
    table: &str,
    columns: &[(&str, &str)],
) -> Result<usize> {
    conn.execute(
        &format!("INSERT OR IGNORE INTO {}(budget_id) VALUES (?1)", table),
        params![budget_id],
    )?;
    let mut touched = 0;
    for (flag, column) in columns {
        if let Some(s) = sub.get_one::<String>(flag) {
            let v = parse_decimal(s).with_context(|| format!("Invalid value for --{}", flag))?;
            conn.execute(
                &format!("UPDATE {} SET {}=?1 WHERE budget_id=?2", table, column),
                params![v.to_string(), budget_id],
            )?;
            touched += 1;
        }
    }
    Ok(touched)
}

fn extras_set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    budget_exists(conn, budget_id)?;
    let n = set_columns(conn, sub, budget_id, "budget_extra_costs", EXTRA_COLUMNS)?;
    println!("Updated {} extra cost field(s) on budget {}", n, budget_id);
    Ok(())
}

fn adjust_set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    budget_exists(conn, budget_id)?;
    let n = set_columns(conn, sub, budget_id, "budget_adjustments", ADJUST_COLUMNS)?;
    println!("Updated {} adjustment field(s) on budget {}", n, budget_id);
    Ok(())
}

fn get_text_decimal(row: &rusqlite::Row<'_>, idx: usize) -> Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}' in column {}", s, idx))
}

pub fn load_tasks(conn: &Connection, budget_id: i64) -> Result<Vec<BudgetTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, hours, hourly_rate, collaborator_id
         FROM budget_tasks WHERE budget_id=?1 ORDER BY id",
    )?;
    let mut cur = stmt.query(params![budget_id])?;
    let mut tasks = Vec::new();
    while let Some(r) = cur.next()? {
        tasks.push(BudgetTask {
            id: r.get(0)?,
            budget_id,
            description: r.get(1)?,
            hours: get_text_decimal(r, 2)?,
            hourly_rate: get_text_decimal(r, 3)?,
            collaborator_id: r.get(4)?,
        });
    }
    Ok(tasks)
}

fn load_extras(conn: &Connection, budget_id: i64) -> Result<BudgetExtraCost> {
    let row = conn
        .query_row(
            "SELECT technical_visit, transport, printing, fees, other
             FROM budget_extra_costs WHERE budget_id=?1",
            params![budget_id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((tv, tr, pr, fe, ot)) = row else {
        return Ok(BudgetExtraCost::default());
    };
    let p = |s: String| {
        s.parse::<Decimal>()
            .with_context(|| format!("Invalid extra cost '{}'", s))
    };
    Ok(BudgetExtraCost {
        technical_visit: p(tv)?,
        transport: p(tr)?,
        printing: p(pr)?,
        fees: p(fe)?,
        other: p(ot)?,
    })
}

fn load_adjustments(conn: &Connection, budget_id: i64) -> Result<BudgetAdjustment> {
    let row = conn
        .query_row(
            "SELECT complexity_pct, technical_reserve_pct, client_difficulty_pct, extras_pct,
                    profit_pct, taxes_pct, card_fee_pct, discount_pct
             FROM budget_adjustments WHERE budget_id=?1",
            params![budget_id],
            |r| {
                let mut v = Vec::with_capacity(8);
                for i in 0..8 {
                    v.push(r.get::<_, String>(i)?);
                }
                Ok(v)
            },
        )
        .optional()?;
    let Some(v) = row else {
        return Ok(BudgetAdjustment::default());
    };
    let p = |s: &String| {
        s.parse::<Decimal>()
            .with_context(|| format!("Invalid adjustment '{}'", s))
    };
    Ok(BudgetAdjustment {
        complexity_pct: p(&v[0])?,
        technical_reserve_pct: p(&v[1])?,
        client_difficulty_pct: p(&v[2])?,
        extras_pct: p(&v[3])?,
        profit_pct: p(&v[4])?,
        taxes_pct: p(&v[5])?,
        card_fee_pct: p(&v[6])?,
        discount_pct: p(&v[7])?,
    })
}

/// Gather everything the pricing engine needs for one budget.
pub fn load_input(conn: &Connection, budget_id: i64) -> Result<QuoteInput> {
    let area_s: String = conn
        .query_row(
            "SELECT area FROM budgets WHERE id=?1",
            params![budget_id],
            |r| r.get(0),
        )
        .optional()?
        .with_context(|| format!("Budget {} not found", budget_id))?;
    let area = area_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid area '{}'", area_s))?;
    Ok(QuoteInput {
        tasks: load_tasks(conn, budget_id)?,
        extras: load_extras(conn, budget_id)?,
        adjustments: load_adjustments(conn, budget_id)?,
        area,
    })
}

/// Run the pricing engine for a budget and rewrite its result snapshot.
/// Recomputation is idempotent: same inputs, same snapshot.
pub fn recalculate(conn: &Connection, budget_id: i64) -> Result<BudgetResult> {
    let input = load_input(conn, budget_id)?;
    let result = quote(&input);
    conn.execute(
        "INSERT INTO budget_results(
            budget_id, base_value, technical_adjustments_value, profit_value,
            taxes_and_fees_value, final_value, hourly_rate, sq_meter_rate,
            discount_value, final_value_with_discount, profit_margin_pct, computed_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,datetime('now'))
         ON CONFLICT(budget_id) DO UPDATE SET
            base_value=excluded.base_value,
            technical_adjustments_value=excluded.technical_adjustments_value,
            profit_value=excluded.profit_value,
            taxes_and_fees_value=excluded.taxes_and_fees_value,
            final_value=excluded.final_value,
            hourly_rate=excluded.hourly_rate,
            sq_meter_rate=excluded.sq_meter_rate,
            discount_value=excluded.discount_value,
            final_value_with_discount=excluded.final_value_with_discount,
            profit_margin_pct=excluded.profit_margin_pct,
            computed_at=excluded.computed_at",
        params![
            budget_id,
            result.base_value.to_string(),
            result.technical_adjustments_value.to_string(),
            result.profit_value.to_string(),
            result.taxes_and_fees_value.to_string(),
            result.final_value.to_string(),
            result.hourly_rate.to_string(),
            result.sq_meter_rate.to_string(),
            result.discount_value.to_string(),
            result.final_value_with_discount.to_string(),
            result.profit_margin_pct.to_string(),
        ],
    )?;
    Ok(result)
}

pub fn load_result(conn: &Connection, budget_id: i64) -> Result<Option<BudgetResult>> {
    let row = conn
        .query_row(
            "SELECT base_value, technical_adjustments_value, profit_value,
                    taxes_and_fees_value, final_value, hourly_rate, sq_meter_rate,
                    discount_value, final_value_with_discount, profit_margin_pct
             FROM budget_results WHERE budget_id=?1",
            params![budget_id],
            |r| {
                let mut v = Vec::with_capacity(10);
                for i in 0..10 {
                    v.push(r.get::<_, String>(i)?);
                }
                Ok(v)
            },
        )
        .optional()?;
    let Some(v) = row else {
        return Ok(None);
    };
    let p = |s: &String| {
        s.parse::<Decimal>()
            .with_context(|| format!("Invalid stored result '{}'", s))
    };
    Ok(Some(BudgetResult {
        base_value: p(&v[0])?,
        technical_adjustments_value: p(&v[1])?,
        profit_value: p(&v[2])?,
        taxes_and_fees_value: p(&v[3])?,
        final_value: p(&v[4])?,
        hourly_rate: p(&v[5])?,
        sq_meter_rate: p(&v[6])?,
        discount_value: p(&v[7])?,
        final_value_with_discount: p(&v[8])?,
        profit_margin_pct: p(&v[9])?,
    }))
}

fn result_rows(ccy: &str, r: &BudgetResult) -> Vec<Vec<String>> {
    let money = |d: &Decimal| fmt_money(d, ccy);
    vec![
        vec!["Base value".into(), money(&r.base_value)],
        vec![
            "Technical adjustments".into(),
            money(&r.technical_adjustments_value),
        ],
        vec!["Profit".into(), money(&r.profit_value)],
        vec!["Taxes and fees".into(), money(&r.taxes_and_fees_value)],
        vec!["Final value".into(), money(&r.final_value)],
        vec!["Discount".into(), money(&r.discount_value)],
        vec![
            "Final with discount".into(),
            money(&r.final_value_with_discount),
        ],
        vec!["Hourly rate".into(), money(&r.hourly_rate)],
        vec!["Rate per m²".into(), money(&r.sq_meter_rate)],
        vec![
            "Profit margin".into(),
            format!("{:.2}%", r.profit_margin_pct.round_dp(2)),
        ],
    ]
}

fn calc(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    let result = recalculate(conn, budget_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &result)? {
        let ccy = get_currency(conn)?;
        println!(
            "{}",
            pretty_table(&["Quote", "Value"], result_rows(&ccy, &result))
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    budget_exists(conn, budget_id)?;
    let result = load_result(conn, budget_id)?;
    if json_flag || jsonl_flag {
        maybe_print_json(json_flag, jsonl_flag, &result)?;
        return Ok(());
    }
    let (project, area, level, status): (String, String, String, String) = conn.query_row(
        "SELECT p.name, b.area, b.delivery_level, b.status
         FROM budgets b JOIN projects p ON b.project_id=p.id WHERE b.id=?1",
        params![budget_id],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )?;
    println!(
        "Budget {} — project '{}', {} m², {} ({})",
        budget_id, project, area, level, status
    );
    match result {
        Some(r) => {
            let ccy = get_currency(conn)?;
            println!("{}", pretty_table(&["Quote", "Value"], result_rows(&ccy, &r)));
        }
        None => println!("Not calculated yet; run: budget calc --budget {}", budget_id),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT b.id, p.name, b.area, b.delivery_level, b.status, b.created_at,
                IFNULL(r.final_value_with_discount, '')
         FROM budgets b
         JOIN projects p ON b.project_id=p.id
         LEFT JOIN budget_results r ON r.budget_id=b.id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND b.status=?");
        params_vec.push(status.into());
    }
    if let Some(since) = sub.get_one::<String>("since") {
        let date = parse_date(since)?;
        sql.push_str(" AND date(b.created_at) >= ?");
        params_vec.push(date.to_string());
    }
    sql.push_str(" ORDER BY b.id");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut cur = stmt.query(rusqlite::params_from_iter(params))?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        data.push(vec![
            id.to_string(),
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Id", "Project", "Area (m²)", "Level", "Status", "Created", "Quoted"],
                data
            )
        );
    }
    Ok(())
}
