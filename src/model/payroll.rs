use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::attendance::round2;
use super::{opt_text, text};

pub const MONTHLY_HOURS: f64 = 160.0;
pub const REGULAR_HOURS_CAP: f64 = 40.0;
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

/// (upper bound of band, rate). The last band is open-ended.
const TAX_BANDS: &[(f64, f64)] = &[(25_000.0, 0.15), (50_000.0, 0.20), (f64::INFINITY, 0.25)];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub hourly_rate: f64,
    pub regular_hours: f64,
    pub regular_pay: f64,
    pub overtime_hours: f64,
    pub overtime_pay: f64,
    /// Overtime the caller reported; shown alongside the pay, not priced.
    pub reported_overtime_hours: f64,
    pub gross_pay: f64,
    pub income_tax: f64,
    pub net_pay: f64,
}

/// Splits `total_hours` at the regular cap and prices the excess at the
/// overtime multiplier.
pub fn split_pay(total_hours: f64, hourly_rate: f64) -> (f64, f64, f64, f64) {
    let regular_hours = total_hours.min(REGULAR_HOURS_CAP);
    let overtime_hours = (total_hours - REGULAR_HOURS_CAP).max(0.0);
    let regular_pay = regular_hours * hourly_rate;
    let overtime_pay = overtime_hours * hourly_rate * OVERTIME_MULTIPLIER;
    (regular_hours, regular_pay, overtime_hours, overtime_pay)
}

/// Marginal income tax over the bands.
pub fn income_tax(gross: f64) -> f64 {
    let mut tax = 0.0;
    let mut lower = 0.0;
    for &(upper, rate) in TAX_BANDS {
        if gross <= lower {
            break;
        }
        tax += (gross.min(upper) - lower) * rate;
        lower = upper;
    }
    tax
}

impl PayrollSummary {
    pub fn compute(
        employee_id: &str,
        employee_name: String,
        monthly_salary: f64,
        total_hours: f64,
        reported_overtime_hours: f64,
    ) -> Self {
        let hourly_rate = monthly_salary / MONTHLY_HOURS;
        let (regular_hours, regular_pay, overtime_hours, overtime_pay) =
            split_pay(total_hours, hourly_rate);
        let gross_pay = regular_pay + overtime_pay;
        let tax = income_tax(gross_pay);

        Self {
            employee_id: employee_id.to_string(),
            employee_name,
            hourly_rate: round2(hourly_rate),
            regular_hours,
            regular_pay: round2(regular_pay),
            overtime_hours,
            overtime_pay: round2(overtime_pay),
            reported_overtime_hours,
            gross_pay: round2(gross_pay),
            income_tax: round2(tax),
            net_pay: round2(gross_pay - tax),
        }
    }
}

/// A processed payment, persisted in `paymentRecords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub employee_id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "text")]
    pub amount: String,
    #[serde(default, deserialize_with = "text")]
    pub scope_of_work: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
