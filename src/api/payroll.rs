use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::api::with_store;
use crate::auth::session::AuthUser;
use crate::model::payroll::PayrollSummary;
use crate::store::Store;
use crate::workflow::finance::{self, PaymentInput};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRequest {
    #[schema(example = "EMP1001")]
    pub employee_id: String,
    /// Hours worked in the period. Defaults to the hours accumulated
    /// through attendance.
    #[schema(example = 44.0)]
    pub total_hours: Option<f64>,
    /// Overtime reported for the period. Shown with the summary; pay is
    /// priced from `totalHours` alone.
    #[schema(example = 0.0)]
    #[serde(default)]
    pub overtime_hours: f64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaymentQuery {
    #[schema(example = "EMP1001")]
    /// Filter by employee ID
    pub employee_id: Option<String>,
}

/* =========================
Payroll summary (Accountant/Manager/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/payroll/summary",
    request_body = PayrollRequest,
    responses(
        (status = 200, description = "Pay breakdown for the employee", body = PayrollSummary),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Payroll"
)]
pub async fn payroll_summary(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<PayrollRequest>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let PayrollRequest {
        employee_id,
        total_hours,
        overtime_hours,
    } = payload.into_inner();

    let summary = with_store(&store, move |s| {
        finance::payroll_summary(s, &actor, &employee_id, total_hours, overtime_hours)
    })
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/* =========================
Payments (Accountant/Manager/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/payroll/payments",
    request_body = PaymentInput,
    responses(
        (status = 201, description = "Payment recorded; includes a mailto link for the employee", body = Object, example = json!({
            "message": "Payment recorded",
            "payment": {"id": "PAY1001", "employeeId": "EMP1001", "amount": "1500", "scopeOfWork": "Website audit"},
            "notification": {"to": "ada@example.com", "subject": "Payment Notification"}
        })),
        (status = 400, description = "Missing or invalid fields", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Payroll"
)]
pub async fn create_payment(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<PaymentInput>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let input = payload.into_inner();
    let paid = with_store(&store, move |s| finance::record_payment(s, &actor, input)).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Payment recorded",
        "payment": paid.record,
        "notification": paid.notification
    })))
}

#[utoipa::path(
    get,
    path = "/api/payroll/payments",
    params(PaymentQuery),
    responses(
        (status = 200, description = "Payments, newest first", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Payroll"
)]
pub async fn list_payments(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<PaymentQuery>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let employee_id = query.into_inner().employee_id;
    let payments = with_store(&store, move |s| {
        finance::list_payments(s, &actor, employee_id.as_deref())
    })
    .await?;
    Ok(HttpResponse::Ok().json(payments))
}
