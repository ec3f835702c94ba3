// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use quotedesk::{cli, commands::office, db, pricing, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("office", sub)) = matches.subcommand() {
        office::handle(conn, sub)
    } else {
        panic!("office command not parsed");
    }
}

#[test]
fn office_add_and_breakdown_matches_worked_example() {
    let conn = setup();
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Aluguel",
            "--value", "3500",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Internet",
            "--value", "250",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "variable", "--name", "Material",
            "--value", "250",
        ],
    )
    .unwrap();
    run(&conn, &["quotedesk", "office", "set-reserve", "15"]).unwrap();
    run(&conn, &["quotedesk", "office", "set-hours", "168"]).unwrap();

    let office_cost = utils::load_office_cost(&conn).unwrap();
    let b = pricing::office_breakdown(&office_cost);
    assert_eq!(format!("{:.2}", b.total_costs), "4000.00");
    assert_eq!(format!("{:.2}", b.reserve), "600.00");
    assert_eq!(format!("{:.2}", b.total_with_reserve), "4600.00");
    assert_eq!(format!("{:.2}", b.hourly_cost.round_dp(2)), "27.38");
}

#[test]
fn office_add_refuses_duplicate_names_by_default() {
    let conn = setup();
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Aluguel",
            "--value", "3500",
        ],
    )
    .unwrap();
    let err = run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Aluguel",
            "--value", "1200",
        ],
    );
    assert!(err.is_err());

    // explicit opt-in keeps both rows
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Aluguel",
            "--value", "1200", "--allow-duplicate",
        ],
    )
    .unwrap();
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM office_costs WHERE name='Aluguel'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(n, 2);
}

#[test]
fn office_duplicate_check_is_scoped_by_kind() {
    let conn = setup();
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "fixed", "--name", "Energia",
            "--value", "300",
        ],
    )
    .unwrap();
    // same name under the other kind is a different ledger line
    run(
        &conn,
        &[
            "quotedesk", "office", "add", "--kind", "variable", "--name", "Energia",
            "--value", "120",
        ],
    )
    .unwrap();
}

#[test]
fn office_defaults_apply_without_settings_rows() {
    let conn = setup();
    let office_cost = utils::load_office_cost(&conn).unwrap();
    assert_eq!(office_cost.technical_reserve_pct.to_string(), "15");
    assert_eq!(office_cost.productive_hours_per_month.to_string(), "168");
}

#[test]
fn office_rm_removes_every_line_with_the_name() {
    let conn = setup();
    for value in ["100", "200"] {
        run(
            &conn,
            &[
                "quotedesk", "office", "add", "--kind", "variable", "--name",
                "Impressoes", "--value", value, "--allow-duplicate",
            ],
        )
        .unwrap();
    }
    run(
        &conn,
        &[
            "quotedesk", "office", "rm", "--kind", "variable", "--name", "Impressoes",
        ],
    )
    .unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM office_costs", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}
