//! Leave and overtime requests share one lifecycle:
//! `PENDING -> {APPROVED, REJECTED}`, decided once by a manager or admin.
//!
//! Requests stay in a single collection and the views below are projections
//! by status. Managers and admins submitting on someone's behalf grant the
//! request directly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::ids::IdKind;
use crate::model::RequestStatus;
use crate::model::employee::Employee;
use crate::model::role::Actor;
use crate::notify::MailtoLink;
use crate::store::{Collection, Store};
use crate::validation::Validate;

use super::{Decided, Submission, Verdict, clean_comments, newest_first};

pub trait ReviewableRequest: Validate + Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    const ID_KIND: IdKind;
    /// Human label used in messages, e.g. "Leave request".
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn employee_id(&self) -> &str;
    fn status(&self) -> RequestStatus;
    fn submitted_at(&self) -> Option<DateTime<Utc>>;
    fn decided_at(&self) -> Option<DateTime<Utc>>;

    /// Assigns identity, copies the employee's details and marks the
    /// request pending.
    fn open(&mut self, id: String, employee: &Employee, at: DateTime<Utc>);

    fn close(
        &mut self,
        status: RequestStatus,
        decided_by: &str,
        comments: Option<String>,
        at: DateTime<Utc>,
    );

    /// Email to the requester describing the decision, when an address is
    /// on file.
    fn decision_notice(&self) -> Option<MailtoLink>;
}

pub fn submit<R: ReviewableRequest>(
    store: &Store,
    actor: &Actor,
    mut request: R,
) -> AppResult<Submission> {
    request.validate()?;
    let now = Utc::now();

    store.transaction(|tx| -> AppResult<Submission> {
        let employees: Vec<Employee> = tx.load_collection(Collection::Employees)?;
        let employee = employees
            .iter()
            .find(|e| e.id == request.employee_id())
            .ok_or_else(|| AppError::not_found("Employee", request.employee_id()))?;

        let id = tx.next_id(R::ID_KIND)?;
        request.open(id.clone(), employee, now);

        if actor.role.is_elevated() {
            request.close(RequestStatus::Approved, &actor.username, None, now);
        }
        let status = request.status();

        tx.append(R::COLLECTION, request)?;

        info!(
            id = %id,
            employee_id = %employee.id,
            actor = %actor,
            status = %status,
            "{} submitted",
            R::LABEL
        );

        Ok(Submission {
            id,
            queued: status == RequestStatus::Pending,
            status: status.to_string(),
        })
    })
}

pub fn decide<R: ReviewableRequest>(
    store: &Store,
    actor: &Actor,
    id: &str,
    verdict: Verdict,
    comments: Option<String>,
) -> AppResult<Decided<R>> {
    actor.require_manager_or_admin("approve or reject requests")?;
    let comments = clean_comments(comments);
    let now = Utc::now();
    let status = match verdict {
        Verdict::Approved => RequestStatus::Approved,
        Verdict::Rejected => RequestStatus::Rejected,
    };

    let record = store.transaction(|tx| -> AppResult<R> {
        let mut requests: Vec<R> = tx.load_collection(R::COLLECTION)?;
        let request = requests
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(R::LABEL, id))?;

        if request.status() != RequestStatus::Pending {
            return Err(AppError::conflict(format!(
                "{} {} was already {}",
                R::LABEL,
                id,
                request.status()
            )));
        }

        request.close(status, &actor.username, comments, now);
        let record = request.clone();
        tx.save_collection(R::COLLECTION, &requests)?;
        Ok(record)
    })?;

    info!(id, actor = %actor, status = %status, "{} decided", R::LABEL);

    let notification = record.decision_notice();
    Ok(Decided {
        record,
        notification,
    })
}

pub fn get<R: ReviewableRequest>(store: &Store, id: &str) -> AppResult<R> {
    let requests: Vec<R> = store.load_collection(R::COLLECTION)?;
    requests
        .into_iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| AppError::not_found(R::LABEL, id))
}

/// Every request, optionally narrowed by status and employee, newest
/// submission first.
pub fn list<R: ReviewableRequest>(
    store: &Store,
    status: Option<RequestStatus>,
    employee_id: Option<&str>,
) -> AppResult<Vec<R>> {
    let mut requests: Vec<R> = store.load_collection(R::COLLECTION)?;
    requests.retain(|r| {
        status.is_none_or(|s| r.status() == s) && employee_id.is_none_or(|e| r.employee_id() == e)
    });
    newest_first(&mut requests, R::submitted_at);
    Ok(requests)
}

/// Requests awaiting a decision.
pub fn list_pending<R: ReviewableRequest>(
    store: &Store,
    employee_id: Option<&str>,
) -> AppResult<Vec<R>> {
    list(store, Some(RequestStatus::Pending), employee_id)
}

/// Granted requests, most recently decided first.
pub fn list_current<R: ReviewableRequest>(store: &Store) -> AppResult<Vec<R>> {
    let mut requests = list::<R>(store, Some(RequestStatus::Approved), None)?;
    newest_first(&mut requests, R::decided_at);
    Ok(requests)
}

/// Decided requests either way, most recently decided first.
pub fn list_history<R: ReviewableRequest>(store: &Store) -> AppResult<Vec<R>> {
    let mut requests: Vec<R> = store.load_collection(R::COLLECTION)?;
    requests.retain(|r| r.status() != RequestStatus::Pending);
    newest_first(&mut requests, R::decided_at);
    Ok(requests)
}
