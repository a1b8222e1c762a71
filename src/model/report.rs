use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::employee::Employee;

/// One employee line of a salary report, captured at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub employee_id: String,
    pub name: String,
    pub salary: String,
    pub department: String,
}

impl From<&Employee> for ReportLine {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id.clone(),
            name: employee.full_name(),
            salary: employee.salary.clone(),
            department: employee.department.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTotal {
    pub total_salary: f64,
    pub employee_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_no: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub details: Vec<ReportLine>,
    #[serde(default)]
    pub department_totals: BTreeMap<String, DepartmentTotal>,
    #[serde(default)]
    pub total_salary: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-department salary totals. Salaries that do not parse count as zero.
pub fn department_totals(lines: &[ReportLine]) -> BTreeMap<String, DepartmentTotal> {
    let mut totals: BTreeMap<String, DepartmentTotal> = BTreeMap::new();
    for line in lines {
        let salary = line.salary.trim().replace(',', "").parse::<f64>().unwrap_or(0.0);
        let entry = totals.entry(line.department.clone()).or_default();
        entry.total_salary += salary;
        entry.employee_count += 1;
    }
    totals
}
