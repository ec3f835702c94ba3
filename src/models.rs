// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_id: i64,
    pub status: String,
    pub area: Decimal, // m²
    pub delivery_level: DeliveryLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub hourly_rate: Decimal,
    pub hours_per_day: Decimal,
    pub work_days: i64, // per month
}

/// One named line of the office cost ledger, either fixed or variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub name: String,
    pub value: Decimal,
}

/// Office overhead inputs shared by every quote: the cost ledger plus the
/// contingency percentage and the monthly billable-hour capacity the totals
/// are divided by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeCost {
    pub fixed_costs: Vec<CostItem>,
    pub variable_costs: Vec<CostItem>,
    pub technical_reserve_pct: Decimal,
    pub productive_hours_per_month: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub project_id: i64,
    pub area: Decimal, // m²
    pub delivery_level: DeliveryLevel,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTask {
    pub id: i64,
    pub budget_id: i64,
    pub description: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub collaborator_id: Option<i64>,
}

/// Project costs that are not labor: one row per budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetExtraCost {
    pub technical_visit: Decimal,
    pub transport: Decimal,
    pub printing: Decimal,
    pub fees: Decimal,
    pub other: Decimal,
}

impl BudgetExtraCost {
    pub fn total(&self) -> Decimal {
        self.technical_visit + self.transport + self.printing + self.fees + self.other
    }
}

/// Percentage knobs applied on top of the base value. The first four are
/// additive technical adjustments; profit, taxes and card fee compound on
/// the running subtotal; discount comes off the final value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetAdjustment {
    pub complexity_pct: Decimal,
    pub technical_reserve_pct: Decimal,
    pub client_difficulty_pct: Decimal,
    pub extras_pct: Decimal,
    pub profit_pct: Decimal,
    pub taxes_pct: Decimal,
    pub card_fee_pct: Decimal,
    pub discount_pct: Decimal,
}

/// Derived snapshot persisted after a calculation. Never mutated on its own;
/// rewritten in full whenever the budget is recalculated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub base_value: Decimal,
    pub technical_adjustments_value: Decimal,
    pub profit_value: Decimal,
    pub taxes_and_fees_value: Decimal,
    pub final_value: Decimal,
    pub hourly_rate: Decimal,
    pub sq_meter_rate: Decimal,
    pub discount_value: Decimal,
    pub final_value_with_discount: Decimal,
    pub profit_margin_pct: Decimal,
}

/// Qualitative detail tier of a deliverable. A label on the quote for the
/// client's benefit; not a numeric factor in the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryLevel {
    Basico,
    Executivo,
    Premium,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid delivery level '{0}', expected basico|executivo|premium")]
pub struct ParseDeliveryLevelError(String);

impl FromStr for DeliveryLevel {
    type Err = ParseDeliveryLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basico" | "básico" => Ok(DeliveryLevel::Basico),
            "executivo" => Ok(DeliveryLevel::Executivo),
            "premium" => Ok(DeliveryLevel::Premium),
            other => Err(ParseDeliveryLevelError(other.to_string())),
        }
    }
}

impl fmt::Display for DeliveryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryLevel::Basico => "basico",
            DeliveryLevel::Executivo => "executivo",
            DeliveryLevel::Premium => "premium",
        };
        f.write_str(s)
    }
}
