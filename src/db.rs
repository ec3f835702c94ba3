// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.quotedesk", "Quotedesk", "quotedesk"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("quotedesk.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS clients(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        email TEXT,
        phone TEXT,
        city TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS projects(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        client_id INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        area TEXT NOT NULL DEFAULT '0',
        delivery_level TEXT NOT NULL DEFAULT 'basico',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(client_id) REFERENCES clients(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS collaborators(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        hourly_rate TEXT NOT NULL DEFAULT '0',
        hours_per_day TEXT NOT NULL DEFAULT '8',
        work_days INTEGER NOT NULL DEFAULT 20,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- Office overhead ledger. Names are deliberately NOT unique; the CLI
    -- refuses duplicates unless asked to keep both, and doctor reports them.
    CREATE TABLE IF NOT EXISTS office_costs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('fixed','variable')),
        name TEXT NOT NULL,
        value TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        area TEXT NOT NULL DEFAULT '0',
        delivery_level TEXT NOT NULL DEFAULT 'basico',
        status TEXT NOT NULL DEFAULT 'draft',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS budget_tasks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        budget_id INTEGER NOT NULL,
        description TEXT NOT NULL,
        hours TEXT NOT NULL,
        hourly_rate TEXT NOT NULL,
        collaborator_id INTEGER,
        FOREIGN KEY(budget_id) REFERENCES budgets(id) ON DELETE CASCADE,
        FOREIGN KEY(collaborator_id) REFERENCES collaborators(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_budget_tasks_budget ON budget_tasks(budget_id);

    CREATE TABLE IF NOT EXISTS budget_extra_costs(
        budget_id INTEGER PRIMARY KEY,
        technical_visit TEXT NOT NULL DEFAULT '0',
        transport TEXT NOT NULL DEFAULT '0',
        printing TEXT NOT NULL DEFAULT '0',
        fees TEXT NOT NULL DEFAULT '0',
        other TEXT NOT NULL DEFAULT '0',
        FOREIGN KEY(budget_id) REFERENCES budgets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS budget_adjustments(
        budget_id INTEGER PRIMARY KEY,
        complexity_pct TEXT NOT NULL DEFAULT '0',
        technical_reserve_pct TEXT NOT NULL DEFAULT '0',
        client_difficulty_pct TEXT NOT NULL DEFAULT '0',
        extras_pct TEXT NOT NULL DEFAULT '0',
        profit_pct TEXT NOT NULL DEFAULT '0',
        taxes_pct TEXT NOT NULL DEFAULT '0',
        card_fee_pct TEXT NOT NULL DEFAULT '0',
        discount_pct TEXT NOT NULL DEFAULT '0',
        FOREIGN KEY(budget_id) REFERENCES budgets(id) ON DELETE CASCADE
    );

    -- Derived snapshot, rewritten in full by `budget calc`.
    CREATE TABLE IF NOT EXISTS budget_results(
        budget_id INTEGER PRIMARY KEY,
        base_value TEXT NOT NULL,
        technical_adjustments_value TEXT NOT NULL,
        profit_value TEXT NOT NULL,
        taxes_and_fees_value TEXT NOT NULL,
        final_value TEXT NOT NULL,
        hourly_rate TEXT NOT NULL,
        sq_meter_rate TEXT NOT NULL,
        discount_value TEXT NOT NULL,
        final_value_with_discount TEXT NOT NULL,
        profit_margin_pct TEXT NOT NULL,
        computed_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(budget_id) REFERENCES budgets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS onboarding_tasks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        done INTEGER NOT NULL DEFAULT 0,
        done_at TEXT
    );
    "#,
    )?;
    seed_onboarding(conn)?;
    Ok(())
}

const ONBOARDING_TASKS: &[&str] = &[
    "Set office currency",
    "Register fixed office costs",
    "Register variable office costs",
    "Set technical reserve percentage",
    "Set productive hours per month",
    "Add first collaborator",
    "Add first client",
    "Create first budget",
];

fn seed_onboarding(conn: &Connection) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO onboarding_tasks(name) VALUES (?1)")?;
    for task in ONBOARDING_TASKS {
        stmt.execute([task])?;
    }
    Ok(())
}
