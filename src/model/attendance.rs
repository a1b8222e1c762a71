use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One clock-in/clock-out pair per employee per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Stored under `id`: the record is keyed by the employee it belongs to.
    #[serde(rename = "id")]
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub clock_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttendanceRecord {
    /// Hours between clock-in and clock-out, rounded to two decimals.
    pub fn hours_between(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
        let seconds = (clock_out - clock_in).num_seconds() as f64;
        round2(seconds / 3600.0)
    }
}

/// Running total of worked hours for one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursTotal {
    pub total_hours: f64,
    pub name: String,
}

/// Persisted under `employeeHours`, keyed by employee id.
pub type EmployeeHours = BTreeMap<String, HoursTotal>;

pub const EMPLOYEE_HOURS_KEY: &str = "employeeHours";

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn hours_are_rounded_to_cents() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 17, 20, 0).unwrap();
        assert_eq!(AttendanceRecord::hours_between(start, end), 8.33);
    }

    #[test]
    fn employee_id_is_stored_as_id() {
        let record = AttendanceRecord {
            employee_id: "EMP1001".into(),
            employee_name: "Ada Lovelace".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            clock_in: None,
            clock_out: None,
            hours_worked: None,
            department: None,
            extra: Map::new(),
        };
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["id"], json!("EMP1001"));
        assert_eq!(out["date"], json!("2026-03-02"));
        assert_eq!(out["clockOut"], Value::Null);
    }
}
