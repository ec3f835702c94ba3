// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use quotedesk::{cli, commands, db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn dispatch(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("client", sub)) => commands::clients::handle(conn, sub),
        Some(("project", sub)) => commands::projects::handle(conn, sub),
        Some(("currency", sub)) => commands::currency::handle(conn, sub),
        Some(("onboarding", sub)) => commands::onboarding::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn client_add_and_query() {
    let conn = setup();
    dispatch(
        &conn,
        &[
            "quotedesk", "client", "add", "Ana Souza", "--email", "ana@example.com",
            "--city", "Recife",
        ],
    )
    .unwrap();
    let rows = commands::clients::query_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Ana Souza");
    assert_eq!(rows[0].email, "ana@example.com");
    assert_eq!(rows[0].phone, "");
}

#[test]
fn client_names_are_unique() {
    let conn = setup();
    dispatch(&conn, &["quotedesk", "client", "add", "Ana Souza"]).unwrap();
    assert!(dispatch(&conn, &["quotedesk", "client", "add", "Ana Souza"]).is_err());
}

#[test]
fn client_rm_cascades_to_projects_and_budgets() {
    let conn = setup();
    dispatch(&conn, &["quotedesk", "client", "add", "Ana Souza"]).unwrap();
    dispatch(
        &conn,
        &[
            "quotedesk", "project", "add", "Loft Centro", "--client", "Ana Souza",
            "--area", "80", "--level", "executivo",
        ],
    )
    .unwrap();
    conn.execute("INSERT INTO budgets(project_id) VALUES(1)", [])
        .unwrap();

    dispatch(&conn, &["quotedesk", "client", "rm", "Ana Souza"]).unwrap();
    let projects: i64 = conn
        .query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))
        .unwrap();
    let budgets: i64 = conn
        .query_row("SELECT COUNT(*) FROM budgets", [], |r| r.get(0))
        .unwrap();
    assert_eq!(projects, 0);
    assert_eq!(budgets, 0);
}

#[test]
fn project_rejects_invalid_delivery_level() {
    let conn = setup();
    dispatch(&conn, &["quotedesk", "client", "add", "Ana Souza"]).unwrap();
    let res = dispatch(
        &conn,
        &[
            "quotedesk", "project", "add", "Loft Centro", "--client", "Ana Souza",
            "--level", "luxo",
        ],
    );
    assert!(res.is_err());
}

#[test]
fn currency_defaults_to_brl_and_is_settable() {
    let conn = setup();
    assert_eq!(utils::get_currency(&conn).unwrap(), "BRL");
    dispatch(&conn, &["quotedesk", "currency", "set", "usd"]).unwrap();
    assert_eq!(utils::get_currency(&conn).unwrap(), "USD");
}

#[test]
fn onboarding_progress_counts_completed_rows() {
    let conn = setup();
    let (done, total) = commands::onboarding::progress(&conn).unwrap();
    assert_eq!(done, 0);
    assert!(total > 0);

    dispatch(
        &conn,
        &["quotedesk", "onboarding", "done", "Add first client"],
    )
    .unwrap();
    let (done, _) = commands::onboarding::progress(&conn).unwrap();
    assert_eq!(done, 1);

    // unknown task is an error, not a silent no-op
    assert!(dispatch(&conn, &["quotedesk", "onboarding", "done", "nope"]).is_err());
}

#[test]
fn onboarding_seed_is_idempotent() {
    let mut conn = setup();
    let before: i64 = conn
        .query_row("SELECT COUNT(*) FROM onboarding_tasks", [], |r| r.get(0))
        .unwrap();
    db::init_schema(&mut conn).unwrap();
    let after: i64 = conn
        .query_row("SELECT COUNT(*) FROM onboarding_tasks", [], |r| r.get(0))
        .unwrap();
    assert_eq!(before, after);
}
