use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::model::attendance::{
    AttendanceRecord, EMPLOYEE_HOURS_KEY, EmployeeHours, HoursTotal, round2,
};
use crate::model::employee::Employee;
use crate::store::{Collection, Store};
use crate::validation;

use super::newest_first;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Punch {
    In,
    Out,
}

pub fn clock_in(store: &Store, employee_id: &str) -> AppResult<AttendanceRecord> {
    punch(store, employee_id, Punch::In, Utc::now())
}

pub fn clock_out(store: &Store, employee_id: &str) -> AppResult<AttendanceRecord> {
    punch(store, employee_id, Punch::Out, Utc::now())
}

/// Records a clock-in or clock-out for `employee_id` on the calendar day of
/// `at`. Clock-out adds the worked hours to the employee's running total.
pub fn punch(
    store: &Store,
    employee_id: &str,
    kind: Punch,
    at: DateTime<Utc>,
) -> AppResult<AttendanceRecord> {
    let employee_id = employee_id.trim();
    validation::require(&[("employeeId", Some(employee_id))])?;
    let today = at.date_naive();

    let record = store.transaction(|tx| -> AppResult<AttendanceRecord> {
        let employees: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let employee = employees
            .iter()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| AppError::not_found("Employee", employee_id))?;
        let name = employee.full_name();

        let mut records: Vec<AttendanceRecord> =
            tx.load_collection(Collection::AttendanceRecords)?;
        let existing = records
            .iter()
            .position(|r| r.employee_id == employee_id && r.date == today);

        let record = match kind {
            Punch::In => {
                if existing.is_some_and(|i| records[i].clock_in.is_some()) {
                    return Err(AppError::conflict(format!(
                        "Already clocked in for {name} today"
                    )));
                }

                let record = AttendanceRecord {
                    employee_id: employee_id.to_string(),
                    employee_name: name,
                    date: today,
                    clock_in: Some(at),
                    clock_out: None,
                    hours_worked: None,
                    department: Some(employee.department.clone()),
                    extra: Default::default(),
                };
                match existing {
                    Some(i) => records[i] = record.clone(),
                    None => records.push(record.clone()),
                }
                record
            }
            Punch::Out => {
                let i = existing
                    .filter(|&i| records[i].clock_in.is_some())
                    .ok_or_else(|| {
                        AppError::conflict("No clock-in record found for today. Please clock in first.")
                    })?;
                let record = &mut records[i];
                if record.clock_out.is_some() {
                    return Err(AppError::conflict("Already clocked out for today."));
                }

                let hours = record
                    .clock_in
                    .map(|start| AttendanceRecord::hours_between(start, at))
                    .unwrap_or_default();
                record.clock_out = Some(at);
                record.hours_worked = Some(hours);
                let record = record.clone();

                let mut totals: EmployeeHours = tx.load_value(EMPLOYEE_HOURS_KEY)?;
                let total = totals
                    .entry(employee_id.to_string())
                    .or_insert_with(|| HoursTotal {
                        total_hours: 0.0,
                        name: name.clone(),
                    });
                total.total_hours = round2(total.total_hours + hours);
                tx.save_value(EMPLOYEE_HOURS_KEY, &totals)?;
                record
            }
        };

        tx.save_collection(Collection::AttendanceRecords, &records)?;
        Ok(record)
    })?;

    info!(employee_id, kind = ?kind, hours = ?record.hours_worked, "Attendance recorded");
    Ok(record)
}

/// Attendance rows, most recent clock-in first.
pub fn list(store: &Store, employee_id: Option<&str>) -> AppResult<Vec<AttendanceRecord>> {
    let mut records: Vec<AttendanceRecord> = store.load_collection(Collection::AttendanceRecords)?;
    if let Some(id) = employee_id {
        records.retain(|r| r.employee_id == id);
    }
    newest_first(&mut records, |r| r.clock_in);
    Ok(records)
}

/// Running totals of worked hours keyed by employee id.
pub fn hours(store: &Store) -> AppResult<EmployeeHours> {
    Ok(store.load_value(EMPLOYEE_HOURS_KEY)?)
}
