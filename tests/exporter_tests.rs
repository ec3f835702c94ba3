// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use quotedesk::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO clients(name, email, city) VALUES('Ana Souza', 'ana@example.com', 'Recife')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO projects(name, client_id, area, delivery_level) \
         VALUES('Loft Centro', 1, '80', 'premium')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO budgets(project_id, area) VALUES(1, '80')", [])
        .unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(conn, sub)
    } else {
        panic!("export command not parsed");
    }
}

#[test]
fn export_clients_writes_pretty_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("clients.json");
    let out_str = out_path.to_string_lossy().to_string();

    run(
        &conn,
        &[
            "quotedesk", "export", "clients", "--format", "json", "--out", &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], json!("Ana Souza"));
    assert_eq!(arr[0]["email"], json!("ana@example.com"));
    assert_eq!(arr[0]["city"], json!("Recife"));
}

#[test]
fn export_budgets_csv_includes_uncalculated_rows() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("budgets.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run(
        &conn,
        &[
            "quotedesk", "export", "budgets", "--format", "csv", "--out", &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,project,client,"));
    let row = lines.next().unwrap();
    assert!(row.contains("Loft Centro"));
    assert!(row.contains("Ana Souza"));
    // no result yet: derived columns are empty
    assert!(row.ends_with(",,,,"));
}

#[test]
fn export_budgets_csv_after_calc_carries_the_quote() {
    let conn = setup();
    conn.execute(
        "INSERT INTO budget_tasks(budget_id, description, hours, hourly_rate) \
         VALUES(1, 'Estudo', '10', '50')",
        [],
    )
    .unwrap();
    quotedesk::commands::budgets::recalculate(&conn, 1).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("budgets.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run(
        &conn,
        &[
            "quotedesk", "export", "budgets", "--format", "csv", "--out", &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("500"));
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let res = run(
        &conn,
        &[
            "quotedesk", "export", "budgets", "--format", "xml", "--out", &out_str,
        ],
    );
    assert!(res.is_err());
    assert!(!out_path.exists());
}
