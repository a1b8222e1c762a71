//! Employee profile lifecycle.
//!
//! Live records sit in `employeeData`, provisional ones in
//! `pendingEmployees`. Approval moves a record from the second collection to
//! the first inside a single store transaction. Rejected records stay behind
//! in the pending collection as an audit trail.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::export;
use crate::ids::IdKind;
use crate::model::employee::{ChangeKind, Employee, EmployeeStatus, MANAGED_KEYS};
use crate::model::role::Actor;
use crate::store::{Collection, Store};
use crate::utils::record_patch::{from_object, merge_patch, to_object};
use crate::validation::Validate;

use super::{Submission, Verdict, clean_comments, newest_first};

/// Creates a new employee. Managers and admins write straight to the live
/// collection; everyone else queues the record for approval.
pub fn submit(store: &Store, actor: &Actor, mut employee: Employee) -> AppResult<Submission> {
    employee.validate()?;
    let now = Utc::now();
    let elevated = actor.role.is_elevated();

    let submission = store.transaction(|tx| -> AppResult<Submission> {
        let id = tx.next_id(IdKind::Employee)?;

        employee.id = id.clone();
        employee.date_created = Some(now);
        employee.last_modified = Some(now);
        employee.original_id = None;
        employee.change = None;
        employee.clear_decision();

        if elevated {
            employee.status = EmployeeStatus::Active;
            tx.append(Collection::Employees, employee)?;
        } else {
            employee.status = EmployeeStatus::Pending;
            tx.append(Collection::PendingEmployees, employee)?;
        }

        Ok(Submission {
            id,
            queued: !elevated,
            status: if elevated {
                EmployeeStatus::Active
            } else {
                EmployeeStatus::Pending
            }
            .to_string(),
        })
    })?;

    info!(id = %submission.id, actor = %actor, queued = submission.queued, "Employee submitted");
    Ok(submission)
}

/// Applies `changes` to live employee `id`.
///
/// Elevated roles edit in place. Other roles get a pending copy carrying
/// `originalId` and `type = "update"`; approving that copy replaces the
/// live record.
pub fn submit_update(
    store: &Store,
    actor: &Actor,
    id: &str,
    changes: &Value,
) -> AppResult<Submission> {
    let now = Utc::now();
    let elevated = actor.role.is_elevated();

    let submission = store.transaction(|tx| -> AppResult<Submission> {
        let mut live: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let idx = live
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AppError::not_found("Employee", id))?;

        let mut fields = to_object(&live[idx])?;
        let changed = merge_patch(&mut fields, changes, MANAGED_KEYS)?;
        let mut updated: Employee = from_object(fields)?;
        updated.validate()?;

        if elevated {
            updated.last_modified = Some(now);
            live[idx] = updated;
            tx.save_collection(Collection::Employees, &live)?;

            info!(id, actor = %actor, changed = ?changed, "Employee updated");
            return Ok(Submission {
                id: id.to_string(),
                queued: false,
                status: live[idx].status.to_string(),
            });
        }

        let proposal_id = tx.next_id(IdKind::Employee)?;
        updated.id = proposal_id.clone();
        updated.original_id = Some(id.to_string());
        updated.change = Some(ChangeKind::Update);
        updated.status = EmployeeStatus::Pending;
        updated.date_created = Some(now);
        updated.last_modified = Some(now);
        updated.clear_decision();
        tx.append(Collection::PendingEmployees, updated)?;

        info!(id = %proposal_id, original_id = id, actor = %actor, changed = ?changed, "Employee update queued");
        Ok(Submission {
            id: proposal_id,
            queued: true,
            status: EmployeeStatus::Pending.to_string(),
        })
    })?;

    Ok(submission)
}

pub fn delete(store: &Store, actor: &Actor, id: &str) -> AppResult<Employee> {
    actor.require_manager_or_admin("delete employees")?;

    let removed = store.transaction(|tx| -> AppResult<Employee> {
        let mut live: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let idx = live
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AppError::not_found("Employee", id))?;

        let removed = live.remove(idx);
        tx.save_collection(Collection::Employees, &live)?;
        Ok(removed)
    })?;

    info!(id, actor = %actor, "Employee deleted");
    Ok(removed)
}

/// Approves or rejects pending employee `id`.
///
/// Approval writes the live record and removes the pending one in the same
/// commit. A record is decided at most once.
pub fn decide(
    store: &Store,
    actor: &Actor,
    id: &str,
    verdict: Verdict,
    comments: Option<String>,
) -> AppResult<Employee> {
    actor.require_manager_or_admin("approve or reject employees")?;
    let comments = clean_comments(comments);
    let now = Utc::now();

    let record = store.transaction(|tx| -> AppResult<Employee> {
        let mut pending: Vec<Employee> = tx.load_collection(Collection::PendingEmployees)?;
        let Some(idx) = pending.iter().position(|e| e.id == id) else {
            // approval moved it out of the pending collection
            let live: Vec<Employee> = tx.load_collection(Collection::Employees)?;
            if live.iter().any(|e| e.id == id && e.approval_date.is_some()) {
                return Err(AppError::conflict(format!(
                    "Employee {id} was already approved"
                )));
            }
            return Err(AppError::not_found("Pending employee", id));
        };

        if pending[idx].status != EmployeeStatus::Pending {
            return Err(AppError::conflict(format!(
                "Employee {} was already {}",
                id, pending[idx].status
            )));
        }

        match verdict {
            Verdict::Rejected => {
                let record = &mut pending[idx];
                record.status = EmployeeStatus::Rejected;
                record.rejection_date = Some(now);
                record.decided_by = Some(actor.username.clone());
                record.approval_comments = comments;
                let record = record.clone();

                tx.save_collection(Collection::PendingEmployees, &pending)?;
                Ok(record)
            }
            Verdict::Approved => {
                let mut record = pending.remove(idx);
                record.status = EmployeeStatus::Approved;
                record.approval_date = Some(now);
                record.rejection_date = None;
                record.decided_by = Some(actor.username.clone());
                record.approval_comments = comments;

                let mut live: Vec<Employee> = tx.load_collection(Collection::Employees)?;
                if record.is_update_proposal() {
                    let original_id = record.original_id.take().unwrap_or_default();
                    let target = live
                        .iter()
                        .position(|e| e.id == original_id)
                        .ok_or_else(|| {
                            AppError::conflict(format!(
                                "Employee {original_id} no longer exists"
                            ))
                        })?;

                    record.id = original_id;
                    record.change = None;
                    record.date_created = live[target].date_created.or(record.date_created);
                    record.last_modified = Some(now);
                    live[target] = record.clone();
                } else {
                    if live.iter().any(|e| e.id == record.id) {
                        return Err(AppError::conflict(format!(
                            "Employee {} already exists",
                            record.id
                        )));
                    }
                    live.push(record.clone());
                }

                // live first; both keys land in the same commit
                tx.save_collection(Collection::Employees, &live)?;
                tx.save_collection(Collection::PendingEmployees, &pending)?;
                Ok(record)
            }
        }
    })?;

    info!(id, live_id = %record.id, actor = %actor, verdict = %verdict, "Employee decided");
    Ok(record)
}

/// Live record first, then the pending collection.
pub fn get(store: &Store, id: &str) -> AppResult<Employee> {
    let (live, pending) = both_collections(store)?;
    live.into_iter()
        .chain(pending)
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::not_found("Employee", id))
}

/// Live and pending records read from the same snapshot; a concurrent
/// approval is seen either entirely or not at all.
fn both_collections(store: &Store) -> AppResult<(Vec<Employee>, Vec<Employee>)> {
    store.read(|tx| -> AppResult<_> {
        Ok((
            tx.load_collection(Collection::Employees)?,
            tx.load_collection(Collection::PendingEmployees)?,
        ))
    })
}

/// Records in the pending collection, optionally narrowed by status, newest
/// submission first.
pub fn list_pending(store: &Store, status: Option<EmployeeStatus>) -> AppResult<Vec<Employee>> {
    let mut pending: Vec<Employee> = store.load_collection(Collection::PendingEmployees)?;
    if let Some(status) = status {
        pending.retain(|e| e.status == status);
    }
    newest_first(&mut pending, |e| e.date_created);
    Ok(pending)
}

/// The live roster, most recently changed first.
pub fn list_current(store: &Store) -> AppResult<Vec<Employee>> {
    let mut live: Vec<Employee> = store.load_collection(Collection::Employees)?;
    newest_first(&mut live, |e| e.last_modified.or(e.date_created));
    Ok(live)
}

/// Every decided record: approvals now live plus rejections left in the
/// pending collection, most recent decision first.
pub fn list_history(store: &Store) -> AppResult<Vec<Employee>> {
    let (live, pending) = both_collections(store)?;

    let mut decided: Vec<Employee> = live
        .into_iter()
        .filter(|e| e.approval_date.is_some())
        .chain(
            pending
                .into_iter()
                .filter(|e| e.status != EmployeeStatus::Pending),
        )
        .collect();
    newest_first(&mut decided, Employee::decided_at);
    Ok(decided)
}

/// Case-insensitive search over live and pending records. A blank term
/// returns everything.
pub fn search(store: &Store, term: &str) -> AppResult<Vec<Employee>> {
    let term = term.trim();
    let (live, pending) = both_collections(store)?;

    Ok(live
        .into_iter()
        .chain(pending)
        .filter(|e| term.is_empty() || e.matches(term))
        .collect())
}

pub fn pending_count(store: &Store) -> AppResult<usize> {
    let pending: Vec<Employee> = store.load_collection(Collection::PendingEmployees)?;
    Ok(pending
        .iter()
        .filter(|e| e.status == EmployeeStatus::Pending)
        .count())
}

/// Drops pending records whose id is already live. Returns how many were
/// removed.
pub fn reconcile(store: &Store) -> AppResult<usize> {
    let removed = store.transaction(|tx| -> AppResult<usize> {
        let live: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let mut pending: Vec<Employee> = tx.load_collection(Collection::PendingEmployees)?;

        let before = pending.len();
        pending.retain(|p| !live.iter().any(|e| e.id == p.id));
        let removed = before - pending.len();

        if removed > 0 {
            tx.save_collection(Collection::PendingEmployees, &pending)?;
        }
        Ok(removed)
    })?;

    if removed > 0 {
        warn!(removed, "Dropped pending employees that were already live");
    }
    Ok(removed)
}

/// CSV of the live collection. Empty string when there are no employees.
pub fn export_csv(store: &Store, actor: &Actor) -> AppResult<String> {
    actor.require_manager_or_admin("export employee data")?;
    let records: Vec<Value> = store.load_collection(Collection::Employees)?;
    Ok(export::records_to_csv(&records))
}
