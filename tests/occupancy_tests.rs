// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use quotedesk::commands::collaborators::occupancy_compute;
use quotedesk::db;
use rusqlite::{params, Connection};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO clients(name) VALUES('Cliente')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO projects(name, client_id) VALUES('Projeto', 1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO collaborators(name, role, hourly_rate, hours_per_day, work_days) \
         VALUES('Marina', 'arquiteta', '90', '6', 20)",
        [],
    )
    .unwrap();
    conn
}

fn add_budget(conn: &Connection, status: &str) -> i64 {
    conn.execute(
        "INSERT INTO budgets(project_id, status) VALUES(1, ?1)",
        params![status],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn assign(conn: &Connection, budget_id: i64, hours: &str) {
    conn.execute(
        "INSERT INTO budget_tasks(budget_id, description, hours, hourly_rate, collaborator_id) \
         VALUES(?1, 'tarefa', ?2, '90', 1)",
        params![budget_id, hours],
    )
    .unwrap();
}

#[test]
fn occupancy_from_assigned_task_hours() {
    let conn = setup();
    let b = add_budget(&conn, "draft");
    assign(&conn, b, "30");
    assign(&conn, b, "30");

    // capacity 6h x 20d = 120; assigned 60 -> 50%
    let (capacity, assigned, pct) = occupancy_compute(&conn, 1).unwrap();
    assert_eq!(format!("{:.2}", capacity), "120.00");
    assert_eq!(format!("{:.2}", assigned), "60.00");
    assert_eq!(format!("{:.2}", pct), "50.00");
}

#[test]
fn occupancy_ignores_closed_budgets() {
    let conn = setup();
    let open = add_budget(&conn, "approved");
    let closed = add_budget(&conn, "closed");
    assign(&conn, open, "24");
    assign(&conn, closed, "80");

    let (_, assigned, pct) = occupancy_compute(&conn, 1).unwrap();
    assert_eq!(format!("{:.2}", assigned), "24.00");
    assert_eq!(format!("{:.2}", pct), "20.00");
}

#[test]
fn occupancy_zero_capacity_is_guarded() {
    let conn = setup();
    conn.execute(
        "UPDATE collaborators SET hours_per_day='0', work_days=0 WHERE id=1",
        [],
    )
    .unwrap();
    let b = add_budget(&conn, "draft");
    assign(&conn, b, "10");

    let (capacity, assigned, pct) = occupancy_compute(&conn, 1).unwrap();
    assert!(capacity.is_zero());
    assert_eq!(format!("{:.2}", assigned), "10.00");
    assert!(pct.is_zero());
}

#[test]
fn occupancy_unassigned_tasks_do_not_count() {
    let conn = setup();
    let b = add_budget(&conn, "draft");
    conn.execute(
        "INSERT INTO budget_tasks(budget_id, description, hours, hourly_rate) \
         VALUES(?1, 'sem responsavel', '40', '70')",
        params![b],
    )
    .unwrap();

    let (_, assigned, _) = occupancy_compute(&conn, 1).unwrap();
    assert!(assigned.is_zero());
}
