use actix_web::{Responder, web};

use crate::api::DecisionBody;
use crate::api::review::{self, RequestQuery, View};
use crate::auth::session::AuthUser;
use crate::model::overtime::OvertimeRequest;
use crate::store::Store;
use crate::workflow::Verdict;

/* =========================
Submit overtime request
========================= */
/// Managers and admins submitting for an employee grant the request
/// directly.
#[utoipa::path(
    post,
    path = "/api/overtime",
    request_body(
        content = Object,
        description = "Overtime request payload",
        content_type = "application/json",
        example = json!({"employeeId": "EMP1001", "supervisor": "Grace Hopper", "overtimeDetails": [{"startDate": "2026-02-03", "endDate": "2026-02-03", "startTime": "17:00", "endTime": "20:00"}]})
    ),
    responses(
        (status = 201, description = "Overtime request submitted", body = Object, example = json!({
            "message": "Overtime request submitted",
            "id": "OT1001",
            "status": "PENDING"
        })),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "At least one overtime entry is required"
        })),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn create_overtime(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<OvertimeRequest>,
) -> actix_web::Result<impl Responder> {
    review::submit(auth, store, payload.into_inner()).await
}

/// Overtime sheets, optionally filtered by status and employee
#[utoipa::path(
    get,
    path = "/api/overtime",
    params(RequestQuery),
    responses(
        (status = 200, description = "Paginated overtime request list, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_list(
    _auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<RequestQuery>,
) -> actix_web::Result<impl Responder> {
    review::list::<OvertimeRequest>(store, query.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/overtime/pending",
    responses(
        (status = 200, description = "Overtime requests awaiting a decision", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn pending_overtime(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<OvertimeRequest>(store, View::Pending).await
}

#[utoipa::path(
    get,
    path = "/api/overtime/current",
    responses(
        (status = 200, description = "Approved overtime requests, most recently decided first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn current_overtime(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<OvertimeRequest>(store, View::Current).await
}

#[utoipa::path(
    get,
    path = "/api/overtime/history",
    responses(
        (status = 200, description = "Decided overtime requests, most recently decided first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_history(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    review::view::<OvertimeRequest>(store, View::History).await
}

/// for getting a overtime request's details
#[utoipa::path(
    get,
    path = "/api/overtime/{id}",
    params(
        ("id" = String, Path, description = "ID of the overtime request, e.g. OT1001")
    ),
    responses(
        (status = 200, description = "Overtime request found", body = Object),
        (status = 404, description = "Overtime request not found", body = Object, example = json!({
            "message": "Overtime request OT9999 not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn get_overtime(
    _auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    review::get::<OvertimeRequest>(store, path.into_inner()).await
}

/* =========================
Approve / reject (Manager/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/overtime/{id}/approve",
    params(
        ("id" = String, Path, description = "ID of the overtime request to approve")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Overtime request approved; includes a mailto link for the requester", body = Object, example = json!({
            "message": "Overtime request approved",
            "request": {"requestNo": "OT1001", "status": "APPROVED"},
            "notification": {"to": "ada@example.com", "subject": "Overtime Request APPROVED"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Overtime request not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    review::decide::<OvertimeRequest>(auth, store, path.into_inner(), Verdict::Approved, body).await
}

#[utoipa::path(
    put,
    path = "/api/overtime/{id}/reject",
    params(
        ("id" = String, Path, description = "ID of the overtime request to reject")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Overtime request rejected", body = Object, example = json!({
            "message": "Overtime request rejected",
            "request": {"requestNo": "OT1001", "status": "REJECTED"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Overtime request not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    review::decide::<OvertimeRequest>(auth, store, path.into_inner(), Verdict::Rejected, body).await
}
