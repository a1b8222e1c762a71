//! Payroll, payments and cheques. Restricted to accountants, managers and
//! admins.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::ids::IdKind;
use crate::model::RequestStatus;
use crate::model::attendance::{EMPLOYEE_HOURS_KEY, EmployeeHours};
use crate::model::cheque::{Cheque, PAYROLL_ACCOUNT, bank_account_name};
use crate::model::employee::Employee;
use crate::model::payroll::{PaymentRecord, PayrollSummary};
use crate::model::role::Actor;
use crate::notify::MailtoLink;
use crate::store::{Collection, Store, Transaction};
use crate::validation::{self, Validate};

use super::{Decided, newest_first};

fn live_employee(tx: &Transaction, id: &str) -> AppResult<Employee> {
    let employees: Vec<Employee> = tx.load_collection(Collection::Employees)?;
    employees
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::not_found("Employee", id))
}

/* =========================
   Payroll
========================= */

/// Pay for one employee. `total_hours` defaults to the hours accumulated
/// through attendance and must be positive. Pay is computed from
/// `total_hours` alone; `overtime_hours` is echoed back for display.
pub fn payroll_summary(
    store: &Store,
    actor: &Actor,
    employee_id: &str,
    total_hours: Option<f64>,
    overtime_hours: f64,
) -> AppResult<PayrollSummary> {
    actor.require_finance("view payroll")?;

    if total_hours.is_some_and(|h| !h.is_finite() || h < 0.0)
        || !overtime_hours.is_finite()
        || overtime_hours < 0.0
    {
        return Err(AppError::validation("Hours must not be negative"));
    }

    let (employee, accumulated) = store.transaction(|tx| -> AppResult<(Employee, f64)> {
        let employee = live_employee(tx, employee_id)?;
        let totals: EmployeeHours = tx.load_value(EMPLOYEE_HOURS_KEY)?;
        let accumulated = totals.get(employee_id).map_or(0.0, |t| t.total_hours);
        Ok((employee, accumulated))
    })?;

    let total_hours = total_hours.unwrap_or(accumulated);
    if total_hours <= 0.0 {
        return Err(AppError::validation("Total hours must be greater than zero"));
    }

    let salary = validation::check_amount("salary", &employee.salary)?;
    Ok(PayrollSummary::compute(
        &employee.id,
        employee.full_name(),
        salary,
        total_hours,
        overtime_hours,
    ))
}

/* =========================
   Payments
========================= */

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub scope_of_work: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn record_payment(
    store: &Store,
    actor: &Actor,
    input: PaymentInput,
) -> AppResult<Decided<PaymentRecord>> {
    actor.require_finance("process payments")?;
    validation::require(&[
        ("employeeId", Some(input.employee_id.as_str())),
        ("amount", Some(input.amount.as_str())),
        ("scopeOfWork", Some(input.scope_of_work.as_str())),
    ])?;
    if validation::check_amount("amount", &input.amount)? <= 0.0 {
        return Err(AppError::validation("amount must be greater than zero"));
    }

    let now = Utc::now();
    let (record, employee) = store.transaction(|tx| -> AppResult<(PaymentRecord, Employee)> {
        let employee = live_employee(tx, input.employee_id.trim())?;
        let record = PaymentRecord {
            id: tx.next_id(IdKind::Payment)?,
            employee_id: employee.id.clone(),
            date: Some(now),
            amount: input.amount.trim().to_string(),
            scope_of_work: input.scope_of_work.trim().to_string(),
            description: crate::model::non_blank(input.description),
            processed_by: Some(actor.username.clone()),
            extra: Default::default(),
        };
        tx.append(Collection::PaymentRecords, record.clone())?;
        Ok((record, employee))
    })?;

    info!(id = %record.id, employee_id = %record.employee_id, actor = %actor, "Payment recorded");

    let notification = payment_notice(&employee, &record);
    Ok(Decided {
        record,
        notification,
    })
}

fn payment_notice(employee: &Employee, payment: &PaymentRecord) -> Option<MailtoLink> {
    let body = format!(
        "Dear {},\n\n\
         This email is to notify you that a payment has been processed:\n\n\
         Scope of Work: {}\n\
         Amount: JMD {}\n\
         Description: {}\n\n\
         Payment has been sent to:\n\
         Bank Branch: {}\n\
         Account Number: {}\n\n\
         Best regards,\n\
         HR Department",
        employee.first_name.trim(),
        payment.scope_of_work,
        payment.amount,
        payment.description.as_deref().unwrap_or(""),
        employee.bank_details.as_deref().unwrap_or(""),
        employee.account_number.as_deref().unwrap_or(""),
    );
    MailtoLink::to_address(employee.email.as_deref(), "Payment Notification", body)
}

pub fn list_payments(
    store: &Store,
    actor: &Actor,
    employee_id: Option<&str>,
) -> AppResult<Vec<PaymentRecord>> {
    actor.require_finance("view payments")?;
    let mut payments: Vec<PaymentRecord> = store.load_collection(Collection::PaymentRecords)?;
    if let Some(id) = employee_id {
        payments.retain(|p| p.employee_id == id);
    }
    newest_first(&mut payments, |p| p.date);
    Ok(payments)
}

/* =========================
   Cheques
========================= */

/// Issues a cheque to a live employee. Amount defaults to the payee's
/// salary, account to the payroll account and date to today.
pub fn create_cheque(store: &Store, actor: &Actor, mut cheque: Cheque) -> AppResult<Cheque> {
    actor.require_finance("issue cheques")?;
    validation::require(&[("payeeId", Some(cheque.payee_id.as_str()))])?;
    let now = Utc::now();

    let cheque = store.transaction(|tx| -> AppResult<Cheque> {
        let payee = live_employee(tx, cheque.payee_id.trim())?;

        if cheque.amount.trim().is_empty() {
            cheque.amount = payee.salary.clone();
        }
        if cheque.bank_account.trim().is_empty() {
            cheque.bank_account = PAYROLL_ACCOUNT.to_string();
        }
        if cheque.date.trim().is_empty() {
            cheque.date = now.date_naive().to_string();
        }
        cheque.validate()?;

        cheque.cheque_no = tx.next_id(IdKind::Cheque)?;
        cheque.payee_id = payee.id.clone();
        cheque.payee = payee.full_name();
        cheque.bank_account = cheque.bank_account.trim().to_string();
        cheque.bank_account_name = bank_account_name(&cheque.bank_account)
            .unwrap_or_default()
            .to_string();
        cheque.status = RequestStatus::Pending;
        cheque.created_at = Some(now);
        cheque.created_by = Some(actor.username.clone());

        tx.append(Collection::Cheques, cheque.clone())?;
        Ok(cheque)
    })?;

    info!(cheque_no = %cheque.cheque_no, payee_id = %cheque.payee_id, actor = %actor, "Cheque issued");
    Ok(cheque)
}

pub fn list_cheques(store: &Store, actor: &Actor) -> AppResult<Vec<Cheque>> {
    actor.require_finance("view cheques")?;
    let mut cheques: Vec<Cheque> = store.load_collection(Collection::Cheques)?;
    newest_first(&mut cheques, |c| c.created_at);
    Ok(cheques)
}

pub fn get_cheque(store: &Store, actor: &Actor, cheque_no: &str) -> AppResult<Cheque> {
    actor.require_finance("view cheques")?;
    let cheques: Vec<Cheque> = store.load_collection(Collection::Cheques)?;
    cheques
        .into_iter()
        .find(|c| c.cheque_no == cheque_no)
        .ok_or_else(|| AppError::not_found("Cheque", cheque_no))
}

pub fn delete_cheque(store: &Store, actor: &Actor, cheque_no: &str) -> AppResult<Cheque> {
    actor.require_finance("delete cheques")?;

    let removed = store.transaction(|tx| -> AppResult<Cheque> {
        let mut cheques: Vec<Cheque> = tx.load_collection(Collection::Cheques)?;
        let idx = cheques
            .iter()
            .position(|c| c.cheque_no == cheque_no)
            .ok_or_else(|| AppError::not_found("Cheque", cheque_no))?;
        let removed = cheques.remove(idx);
        tx.save_collection(Collection::Cheques, &cheques)?;
        Ok(removed)
    })?;

    info!(cheque_no, actor = %actor, "Cheque deleted");
    Ok(removed)
}
