use actix_web::{HttpResponse, Responder, http::header, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::api::{DecisionBody, paginate, with_store};
use crate::auth::session::AuthUser;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::store::Store;
use crate::workflow::{Verdict, employees};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
    /// Case-insensitive match on id, name, department or position. Also
    /// searches pending records.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PendingQuery {
    #[schema(example = "pending")]
    /// Filter by status; defaults to pending. Use `rejected` for the
    /// rejection audit trail.
    pub status: Option<EmployeeStatus>,
}

/* =========================
Create employee
========================= */
/// Managers and admins add the employee directly; other roles queue it for
/// approval.
#[utoipa::path(
    post,
    path = "/api/employee",
    request_body(
        content = Object,
        description = "Employee profile. Unknown fields are stored as given.",
        content_type = "application/json",
        example = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "department": "Engineering",
            "position": "Analyst",
            "dateHired": "2024-01-01",
            "salary": "50000",
            "email": "ada@example.com"
        })
    ),
    responses(
        (status = 201, description = "Employee added or queued", body = Object, example = json!({
            "message": "Employee submitted for approval",
            "id": "EMP1001",
            "queued": true,
            "status": "pending"
        })),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "Missing required fields: position, salary"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<Employee>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let employee = payload.into_inner();

    let submission = with_store(&store, move |s| employees::submit(s, &actor, employee)).await?;

    let message = if submission.queued {
        "Employee submitted for approval"
    } else {
        "Employee added"
    };
    Ok(HttpResponse::Created().json(json!({
        "message": message,
        "id": submission.id,
        "queued": submission.queued,
        "status": submission.status
    })))
}

/* =========================
List / search employees
========================= */
#[utoipa::path(
    get,
    path = "/api/employee",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = Object, example = json!({
            "data": [{
                "id": "EMP1001",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "department": "Engineering",
                "position": "Analyst",
                "status": "approved"
            }],
            "page": 1,
            "per_page": 20,
            "total": 1
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    _auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let search = query.search.filter(|s| !s.trim().is_empty());

    let found = with_store(&store, move |s| match search {
        Some(term) => employees::search(s, &term),
        None => employees::list_current(s),
    })
    .await?;

    Ok(HttpResponse::Ok().json(paginate(found, query.page, query.per_page)))
}

/* =========================
Get employee
========================= */
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID, e.g. EMP1001")
    ),
    responses(
        (status = 200, description = "Employee found (live or pending)", body = Object),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP9999 not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    _auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let employee = with_store(&store, move |s| employees::get(s, &employee_id)).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/* =========================
Update employee
========================= */
/// Partial update. Managers and admins edit the live record; other roles
/// queue the change for approval.
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body(
        content = Object,
        description = "Fields to change",
        content_type = "application/json",
        example = json!({"department": "Research", "salary": "55000"})
    ),
    responses(
        (status = 200, description = "Employee updated or update queued", body = Object, example = json!({
            "message": "Employee update submitted for approval",
            "id": "EMP1002",
            "queued": true,
            "status": "pending"
        })),
        (status = 400, description = "Invalid update", body = Object, example = json!({
            "message": "Field `id` cannot be changed"
        })),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let employee_id = path.into_inner();
    let changes = body.into_inner();

    let submission = with_store(&store, move |s| {
        employees::submit_update(s, &actor, &employee_id, &changes)
    })
    .await?;

    let message = if submission.queued {
        "Employee update submitted for approval"
    } else {
        "Employee updated successfully"
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "id": submission.id,
        "queued": submission.queued,
        "status": submission.status
    })))
}

/* =========================
Delete employee (Manager/Admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let employee_id = path.into_inner();
    with_store(&store, move |s| employees::delete(s, &actor, &employee_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/* =========================
Pending queue
========================= */
#[utoipa::path(
    get,
    path = "/api/employee/pending",
    params(PendingQuery),
    responses(
        (status = 200, description = "Records in the pending collection, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn list_pending(
    _auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<PendingQuery>,
) -> actix_web::Result<impl Responder> {
    let status = query.into_inner().status.unwrap_or(EmployeeStatus::Pending);
    let pending = with_store(&store, move |s| employees::list_pending(s, Some(status))).await?;
    Ok(HttpResponse::Ok().json(pending))
}

#[utoipa::path(
    get,
    path = "/api/employee/pending/count",
    responses(
        (status = 200, description = "Number of employees awaiting a decision", body = Object, example = json!({
            "count": 2
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn pending_count(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    let count = with_store(&store, employees::pending_count).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[utoipa::path(
    get,
    path = "/api/employee/history",
    responses(
        (status = 200, description = "Approved and rejected employees, most recent decision first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn employee_history(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    let history = with_store(&store, employees::list_history).await?;
    Ok(HttpResponse::Ok().json(history))
}

/* =========================
Approve / reject (Manager/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/employee/pending/{employee_id}/approve",
    params(
        ("employee_id" = String, Path, description = "ID of the pending employee")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Employee approved and moved to the live roster", body = Object, example = json!({
            "message": "Employee approved",
            "employee": {"id": "EMP1001", "status": "approved", "decidedBy": "grace"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Pending employee not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn approve_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    decide(auth, store, path.into_inner(), Verdict::Approved, body).await
}

#[utoipa::path(
    put,
    path = "/api/employee/pending/{employee_id}/reject",
    params(
        ("employee_id" = String, Path, description = "ID of the pending employee")
    ),
    request_body(content = DecisionBody, description = "Optional decision comments"),
    responses(
        (status = 200, description = "Employee rejected", body = Object, example = json!({
            "message": "Employee rejected",
            "employee": {"id": "EMP1001", "status": "rejected", "decidedBy": "grace"}
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Pending employee not found", body = Object),
        (status = 409, description = "Already decided", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn reject_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<impl Responder> {
    decide(auth, store, path.into_inner(), Verdict::Rejected, body).await
}

async fn decide(
    auth: AuthUser,
    store: web::Data<Store>,
    employee_id: String,
    verdict: Verdict,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor();
    let comments = DecisionBody::comments(body);

    let employee = with_store(&store, move |s| {
        employees::decide(s, &actor, &employee_id, verdict, comments)
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Employee {verdict}"),
        "employee": employee
    })))
}

/* =========================
Export (Manager/Admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/employee/export",
    responses(
        (status = 200, description = "CSV of the live roster", content_type = "text/csv", body = String),
        (status = 403, description = "Forbidden", body = Object, example = json!({
            "message": "Access denied: only managers can export employee data"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Employee"
)]
pub async fn export_employees(
    auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let csv = with_store(&store, move |s| employees::export_csv(s, &actor)).await?;

    let filename = format!("employees_export_{}.csv", Utc::now().date_naive());
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(csv))
}
