use chrono::Utc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::ids::IdKind;
use crate::model::employee::Employee;
use crate::model::non_blank;
use crate::model::report::{Report, ReportLine, department_totals};
use crate::model::role::Actor;
use crate::store::{Collection, Store};

use super::newest_first;

/// Builds and stores a salary report over the given live employees.
/// Repeated ids are counted once.
pub fn generate(
    store: &Store,
    actor: &Actor,
    employee_ids: &[String],
    date: Option<String>,
) -> AppResult<Report> {
    actor.require_finance("generate reports")?;

    let mut ids: Vec<&str> = Vec::with_capacity(employee_ids.len());
    for id in employee_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(AppError::validation(
            "Please add at least one employee to the report",
        ));
    }

    let now = Utc::now();
    let report = store.transaction(|tx| -> AppResult<Report> {
        let employees: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let details = ids
            .iter()
            .map(|id| {
                employees
                    .iter()
                    .find(|e| e.id == *id)
                    .map(ReportLine::from)
                    .ok_or_else(|| AppError::not_found("Employee", id))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let totals = department_totals(&details);
        let total_salary: f64 = totals.values().map(|t| t.total_salary).sum();

        let report = Report {
            report_no: tx.next_id(IdKind::Report)?,
            date: non_blank(date).or_else(|| Some(now.date_naive().to_string())),
            details,
            department_totals: totals,
            total_salary,
            generated_by: Some(actor.username.clone()),
            generated_at: Some(now),
            extra: Default::default(),
        };
        tx.append(Collection::Reports, report.clone())?;
        Ok(report)
    })?;

    info!(report_no = %report.report_no, employees = report.details.len(), actor = %actor, "Report generated");
    Ok(report)
}

pub fn list(store: &Store, actor: &Actor) -> AppResult<Vec<Report>> {
    actor.require_finance("view reports")?;
    let mut reports: Vec<Report> = store.load_collection(Collection::Reports)?;
    newest_first(&mut reports, |r| r.generated_at);
    Ok(reports)
}

pub fn get(store: &Store, actor: &Actor, report_no: &str) -> AppResult<Report> {
    actor.require_finance("view reports")?;
    let reports: Vec<Report> = store.load_collection(Collection::Reports)?;
    reports
        .into_iter()
        .find(|r| r.report_no == report_no)
        .ok_or_else(|| AppError::not_found("Report", report_no))
}

pub fn delete(store: &Store, actor: &Actor, report_no: &str) -> AppResult<Report> {
    actor.require_finance("delete reports")?;

    let removed = store.transaction(|tx| -> AppResult<Report> {
        let mut reports: Vec<Report> = tx.load_collection(Collection::Reports)?;
        let idx = reports
            .iter()
            .position(|r| r.report_no == report_no)
            .ok_or_else(|| AppError::not_found("Report", report_no))?;
        let removed = reports.remove(idx);
        tx.save_collection(Collection::Reports, &reports)?;
        Ok(removed)
    })?;

    info!(report_no, actor = %actor, "Report deleted");
    Ok(removed)
}
