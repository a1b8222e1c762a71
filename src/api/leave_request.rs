use actix_web::{Responder, web};

use crate::api::DecisionBody;
use crate::api::review::{self, RequestQuery, View};
use crate::auth::session::AuthUser;
use crate::model::leave_request::LeaveRequest;
use crate::store::Store;
use crate::workflow::Verdict;

/* =========================
Submit leave request
========================= */
/// Managers and admins submitting for an employee grant the request
/// directly.
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = Object,
        description = "Leave request payload",
        content_type = "application/json",
        example = json!({"employeeId": "EMP1001", "startDate": "2026-02-03", "endDate": "2026-02-05", "reason": "Family visit"})
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "id": "LR1001",
            "status": "PENDING"
        })),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "Missing required fields: startDate, reason"
        })),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<LeaveRequest>,
) -> actix_web::Result<impl Responder> {
    review::submit(auth, store, payload.into_inner()).await
}

/// for getting leave applications, optionally filtered by status and employee
#[utoipa::path(
    get,
    path = "/api/leave",
    params(RequestQuery),
    responses(
        (status = 200, description = "Paginated leave request list, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    _auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> actix_web::Result<impl Responder> {
    review::list::<LeaveRequest>(store, query.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/leave/pending",
    responses(
        (status = 200, description = "Leave requests awaiting a decision", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<LeaveRequest>(store, View::Pending).await
}

#[utoipa::path(
    get,
    path = "/api/leave/current",
    responses(
        (status = 200, description = "Approved leave requests, most recently decided first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn current_leaves(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<LeaveRequest>(store, View::Current).await
}

#[utoipa::path(
    get,
    path = "/api/leave/history",
    responses(
        (status = 200, description = "Decided leave requests, most recently decided first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<LeaveRequest>(store, View::History).await
}

/// for getting a leave request's details
#[utoipa::path(
    get,
    path = "/api/leave/{id}",
    params(
        ("id" = String, Path, description = "ID of the leave request, e.g. LR1001")
    ),
    responses(
        (status = 200, description = "Leave request found", body = Object),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request LR9999 not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    _auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    review::get::<LeaveRequest>(store, path.into_inner()).await
}

/* =========================
Approve / reject (Manager/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{id}/approve",
    params(
        ("id" = String, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Leave request approved; includes a mailto link for the requester", body = Object, example = json!({
            "message": "Leave request approved",
            "request": {"id": "LR1001", "status": "APPROVED"},
            "notification": {"to": "ada@example.com", "subject": "Leave Request APPROVED"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Leave request not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    review::decide::<LeaveRequest>(auth, store, path.into_inner(), Verdict::Approved, body).await
}

#[utoipa::path(
    put,
    path = "/api/leave/{id}/reject",
    params(
        ("id" = String, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Leave request rejected", body = Object, example = json!({
            "message": "Leave request rejected",
            "request": {"id": "LR1001", "status": "REJECTED"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Leave request not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    review::decide::<LeaveRequest>(auth, store, path.into_inner(), Verdict::Rejected, body).await
}
