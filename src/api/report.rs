use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::{PageQuery, paginate, with_store};
use crate::auth::session::AuthUser;
use crate::store::Store;
use crate::workflow::reports;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    #[schema(example = json!(["EMP1001", "EMP1002"]))]
    #[serde(default)]
    pub employee_ids: Vec<String>,
    #[schema(example = "2026-03-31")]
    pub date: Option<String>,
}

/* =========================
Generate report (Accountant/Manager/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/report",
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report generated", body = Object, example = json!({
            "message": "Report generated and saved successfully",
            "report": {
                "reportNo": "RPT1001",
                "departmentTotals": {"Engineering": {"totalSalary": 90000.0, "employeeCount": 2}},
                "totalSalary": 90000.0
            }
        })),
        (status = 400, description = "No employees selected", body = Object, example = json!({
            "message": "Please add at least one employee to the report"
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Employee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Report"
)]
pub async fn create_report(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CreateReport>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let CreateReport { employee_ids, date } = payload.into_inner();
    let report =
        with_store(&store, move |s| reports::generate(s, &actor, &employee_ids, date)).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Report generated and saved successfully",
        "report": report
    })))
}

#[utoipa::path(
    get,
    path = "/api/report",
    params(PageQuery),
    responses(
        (status = 200, description = "Reports, newest first", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Report"
)]
pub async fn list_reports(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<PageQuery>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let found = with_store(&store, move |s| reports::list(s, &actor)).await?;
    Ok(HttpResponse::Ok().json(paginate(found, query.page, query.per_page)))
}

#[utoipa::path(
    get,
    path = "/api/report/{report_no}",
    params(
        ("report_no" = String, Path, description = "Report number, e.g. RPT1001")
    ),
    responses(
        (status = 200, description = "Report found", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Report not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Report"
)]
pub async fn get_report(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let report_no = path.into_inner();
    let report = with_store(&store, move |s| reports::get(s, &actor, &report_no)).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    delete,
    path = "/api/report/{report_no}",
    params(
        ("report_no" = String, Path, description = "Report number")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Report not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Report"
)]
pub async fn delete_report(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let report_no = path.into_inner();
    with_store(&store, move |s| reports::delete(s, &actor, &report_no)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
