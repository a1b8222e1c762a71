use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::api::with_store;
use crate::auth::session::AuthUser;
use crate::store::Store;
use crate::workflow::attendance;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    #[schema(example = "EMP1001")]
    #[serde(default)]
    pub employee_id: String,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    #[schema(example = "EMP1001")]
    /// Filter by employee ID
    pub employee_id: Option<String>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Clock-in recorded successfully",
            "record": {"id": "EMP1001", "employeeName": "Ada Lovelace", "date": "2026-03-02", "clockIn": "2026-03-02T09:00:00Z"}
        })),
        (status = 404, description = "Employee not found", body = Object),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "message": "Already clocked in for Ada Lovelace today"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    _auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.into_inner().employee_id;
    let record = with_store(&store, move |s| attendance::clock_in(s, &employee_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Clock-in recorded successfully",
        "record": record
    })))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Clock-out recorded successfully",
            "record": {"id": "EMP1001", "hoursWorked": 8.25}
        })),
        (status = 404, description = "Employee not found", body = Object),
        (status = 409, description = "No clock-in today or already clocked out", body = Object, example = json!({
            "message": "No clock-in record found for today. Please clock in first."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    _auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.into_inner().employee_id;
    let record = with_store(&store, move |s| attendance::clock_out(s, &employee_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Clock-out recorded successfully",
        "record": record
    })))
}

/// Attendance history, most recent clock-in first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    _auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = query.into_inner().employee_id;
    let records =
        with_store(&store, move |s| attendance::list(s, employee_id.as_deref())).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/hours",
    responses(
        (status = 200, description = "Accumulated hours per employee", body = Object, example = json!({
            "EMP1001": {"totalHours": 16.5, "name": "Ada Lovelace"}
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Attendance"
)]
pub async fn total_hours(
    _auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<impl Responder> {
    let hours = with_store(&store, attendance::hours).await?;
    Ok(HttpResponse::Ok().json(hours))
}
