// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_productive_hours, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Unconfigured capacity prices every office hour at 0
    let hours = get_productive_hours(conn)?;
    if hours.is_zero() {
        rows.push(vec![
            "zero_productive_hours".into(),
            "hourly office cost is 0; run: office set-hours".into(),
        ]);
    }

    // 2) Duplicate cost names kept in the ledger
    let mut stmt = conn.prepare(
        "SELECT kind, name, COUNT(*) FROM office_costs GROUP BY kind, name HAVING COUNT(*) > 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let kind: String = r.get(0)?;
        let name: String = r.get(1)?;
        let n: i64 = r.get(2)?;
        rows.push(vec![
            "duplicate_cost_name".into(),
            format!("{} '{}' appears {} times", kind, name, n),
        ]);
    }

    // 3) Budgets with no task lines quote labor at 0
    let mut stmt2 = conn.prepare(
        "SELECT b.id FROM budgets b
         LEFT JOIN budget_tasks t ON t.budget_id=b.id
         GROUP BY b.id HAVING COUNT(t.id)=0",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["budget_without_tasks".into(), format!("budget {}", id)]);
    }

    // 4) Budgets never run through the pricing engine
    let mut stmt3 = conn.prepare(
        "SELECT b.id FROM budgets b
         LEFT JOIN budget_results r ON r.budget_id=b.id
         WHERE r.budget_id IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["budget_not_calculated".into(), format!("budget {}", id)]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
