// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use quotedesk::{cli, commands::budgets, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO clients(name) VALUES('Ana Souza')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO projects(name, client_id, area, delivery_level) \
         VALUES('Loft Centro', 1, '80', 'executivo')",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("budget", sub)) = matches.subcommand() {
        budgets::handle(conn, sub).unwrap();
    } else {
        panic!("budget command not parsed");
    }
}

#[test]
fn budget_new_inherits_project_area_and_level() {
    let conn = setup();
    run(&conn, &["quotedesk", "budget", "new", "--project", "Loft Centro"]);
    let (area, level): (String, String) = conn
        .query_row(
            "SELECT area, delivery_level FROM budgets WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(area, "80");
    assert_eq!(level, "executivo");
}

#[test]
fn budget_calc_persists_result_snapshot() {
    let conn = setup();
    run(&conn, &["quotedesk", "budget", "new", "--project", "Loft Centro"]);
    run(
        &conn,
        &[
            "quotedesk", "budget", "task", "add", "--budget", "1", "--desc",
            "Levantamento", "--hours", "10", "--rate", "100",
        ],
    );
    run(
        &conn,
        &[
            "quotedesk", "budget", "task", "add", "--budget", "1", "--desc",
            "Projeto executivo", "--hours", "5", "--rate", "80",
        ],
    );
    run(
        &conn,
        &[
            "quotedesk", "budget", "extras", "--budget", "1",
            "--technical-visit", "60", "--transport", "40",
        ],
    );
    run(
        &conn,
        &[
            "quotedesk", "budget", "adjust", "--budget", "1", "--complexity", "10",
            "--technical-reserve", "5", "--client-difficulty", "3", "--extras", "2",
            "--profit", "20", "--taxes", "6", "--card-fee", "4", "--discount", "10",
        ],
    );

    let result = budgets::recalculate(&conn, 1).unwrap();
    // base 1400 labor + 100 extras = 1500; see pricing_tests for the chain
    assert_eq!(format!("{:.2}", result.base_value), "1500.00");
    assert_eq!(
        format!("{:.2}", result.final_value_with_discount.round_dp(2)),
        "2138.40"
    );

    let stored = budgets::load_result(&conn, 1).unwrap().unwrap();
    assert_eq!(stored, result);
}

#[test]
fn budget_recalculate_is_idempotent() {
    let conn = setup();
    run(&conn, &["quotedesk", "budget", "new", "--project", "Loft Centro"]);
    run(
        &conn,
        &[
            "quotedesk", "budget", "task", "add", "--budget", "1", "--desc",
            "Conceito", "--hours", "12", "--rate", "95",
        ],
    );
    let first = budgets::recalculate(&conn, 1).unwrap();
    let second = budgets::recalculate(&conn, 1).unwrap();
    assert_eq!(first, second);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM budget_results", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn budget_without_inputs_quotes_zero() {
    let conn = setup();
    run(&conn, &["quotedesk", "budget", "new", "--project", "Loft Centro"]);
    let result = budgets::recalculate(&conn, 1).unwrap();
    assert!(result.final_value.is_zero());
    assert!(result.hourly_rate.is_zero());
}

#[test]
fn budget_calc_unknown_budget_is_an_error() {
    let conn = setup();
    assert!(budgets::recalculate(&conn, 42).is_err());
}

#[test]
fn budget_area_override_drives_sq_meter_rate() {
    let conn = setup();
    run(
        &conn,
        &[
            "quotedesk", "budget", "new", "--project", "Loft Centro", "--area", "0",
        ],
    );
    run(
        &conn,
        &[
            "quotedesk", "budget", "task", "add", "--budget", "1", "--desc",
            "Estudo", "--hours", "10", "--rate", "50",
        ],
    );
    // zero area: guarded to 0, no division error
    let result = budgets::recalculate(&conn, 1).unwrap();
    assert!(result.sq_meter_rate.is_zero());
    assert_eq!(format!("{:.2}", result.final_value), "500.00");
}
