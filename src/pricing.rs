// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Quote pricing engine. Pure functions over `Decimal`: office overhead in,
//! hourly cost out; budget inputs in, priced quote out. No I/O, no rounding —
//! values keep full precision and are rounded at render time only.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{BudgetAdjustment, BudgetExtraCost, BudgetResult, BudgetTask, OfficeCost};

/// Aggregated office overhead derived from the cost ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficeBreakdown {
    pub total_fixed: Decimal,
    pub total_variable: Decimal,
    pub total_costs: Decimal,
    pub reserve: Decimal,
    pub total_with_reserve: Decimal,
    pub hourly_cost: Decimal,
}

/// Everything a quote calculation needs, detached from storage.
#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub tasks: Vec<BudgetTask>,
    pub extras: BudgetExtraCost,
    pub adjustments: BudgetAdjustment,
    pub area: Decimal, // m²
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Division that yields 0 on a zero divisor instead of failing. Every divisor
/// in the pipeline goes through this guard: an unconfigured capacity or an
/// empty task list prices at 0, it does not error.
fn safe_div(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() { Decimal::ZERO } else { num / den }
}

/// Parse a user-supplied decimal, falling back to `default` when the input is
/// blank or not a number. Optional numeric fields coalesce to 0 through this
/// helper; required ones go through `utils::parse_decimal` and surface the
/// error instead.
pub fn parse_decimal_or_default(s: &str, default: Decimal) -> Decimal {
    s.trim().parse::<Decimal>().unwrap_or(default)
}

/// Aggregate the office cost ledger: fixed + variable totals, technical
/// reserve on top, and the hourly overhead cost obtained by dividing through
/// the monthly productive hours. `hourly_cost` is 0 when
/// `productive_hours_per_month` is 0.
pub fn office_breakdown(costs: &OfficeCost) -> OfficeBreakdown {
    let total_fixed: Decimal = costs.fixed_costs.iter().map(|c| c.value).sum();
    let total_variable: Decimal = costs.variable_costs.iter().map(|c| c.value).sum();
    let total_costs = total_fixed + total_variable;
    let reserve = total_costs * costs.technical_reserve_pct / HUNDRED;
    let total_with_reserve = total_costs + reserve;
    let hourly_cost = safe_div(total_with_reserve, costs.productive_hours_per_month);
    OfficeBreakdown {
        total_fixed,
        total_variable,
        total_costs,
        reserve,
        total_with_reserve,
        hourly_cost,
    }
}

/// Price a budget. Single pass, deterministic, idempotent: the same input
/// always produces the same `BudgetResult`.
///
/// Pipeline: base value (task hours × rates + extra costs), additive
/// technical adjustment percentages, profit on the adjusted subtotal, taxes
/// and card fee on the subtotal with profit, then discount off the final
/// value. Hourly and per-m² display rates divide the pre-discount final
/// value, guarded for zero hours / zero area.
pub fn quote(input: &QuoteInput) -> BudgetResult {
    let adj = &input.adjustments;

    let total_hours: Decimal = input.tasks.iter().map(|t| t.hours).sum();
    let labor: Decimal = input.tasks.iter().map(|t| t.hours * t.hourly_rate).sum();
    let base_value = labor + input.extras.total();

    let technical_pct =
        adj.complexity_pct + adj.technical_reserve_pct + adj.client_difficulty_pct + adj.extras_pct;
    let technical_adjustments_value = base_value * technical_pct / HUNDRED;

    let profit_value = (base_value + technical_adjustments_value) * adj.profit_pct / HUNDRED;

    let taxes_and_fees_value = (base_value + technical_adjustments_value + profit_value)
        * (adj.taxes_pct + adj.card_fee_pct)
        / HUNDRED;

    let final_value =
        base_value + technical_adjustments_value + profit_value + taxes_and_fees_value;

    let discount_value = final_value * adj.discount_pct / HUNDRED;
    let final_value_with_discount = final_value - discount_value;

    let hourly_rate = safe_div(final_value, total_hours);
    let sq_meter_rate = safe_div(final_value, input.area);

    // Retained profit after discount, as a share of the discounted invoice.
    let retained =
        final_value_with_discount - base_value - technical_adjustments_value - taxes_and_fees_value;
    let profit_margin_pct = safe_div(retained * HUNDRED, final_value_with_discount);

    BudgetResult {
        base_value,
        technical_adjustments_value,
        profit_value,
        taxes_and_fees_value,
        final_value,
        hourly_rate,
        sq_meter_rate,
        discount_value,
        final_value_with_discount,
        profit_margin_pct,
    }
}
