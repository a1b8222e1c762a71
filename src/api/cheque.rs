use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api::{PageQuery, paginate, with_store};
use crate::auth::session::AuthUser;
use crate::model::cheque::Cheque;
use crate::store::Store;
use crate::workflow::finance;

/* =========================
Issue cheque (Accountant/Manager/Admin)
========================= */
/// Amount defaults to the payee's salary and the account to the payroll
/// account.
#[utoipa::path(
    post,
    path = "/api/cheque",
    request_body(
        content = Object,
        description = "Cheque payload",
        content_type = "application/json",
        example = json!({"payeeId": "EMP1001", "date": "2026-03-31", "comments": "March salary"})
    ),
    responses(
        (status = 201, description = "Cheque issued", body = Object, example = json!({
            "message": "Cheque saved successfully",
            "cheque": {
                "chequeNo": "CHQ1001",
                "payee": "Ada Lovelace",
                "amount": "50000",
                "bankAccountName": "Payroll Account - 5678",
                "status": "PENDING"
            }
        })),
        (status = 400, description = "Missing or invalid fields", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Payee not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Cheque"
)]
pub async fn create_cheque(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<Cheque>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let cheque = payload.into_inner();
    let cheque = with_store(&store, move |s| finance::create_cheque(s, &actor, cheque)).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Cheque saved successfully",
        "cheque": cheque
    })))
}

#[utoipa::path(
    get,
    path = "/api/cheque",
    params(PageQuery),
    responses(
        (status = 200, description = "Cheques, newest first", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Cheque"
)]
pub async fn list_cheques(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<PageQuery>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let cheques = with_store(&store, move |s| finance::list_cheques(s, &actor)).await?;
    Ok(HttpResponse::Ok().json(paginate(cheques, query.page, query.per_page)))
}

#[utoipa::path(
    get,
    path = "/api/cheque/{cheque_no}",
    params(
        ("cheque_no" = String, Path, description = "Cheque number, e.g. CHQ1001")
    ),
    responses(
        (status = 200, description = "Cheque found", body = Object),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Cheque not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Cheque"
)]
pub async fn get_cheque(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let cheque_no = path.into_inner();
    let cheque = with_store(&store, move |s| finance::get_cheque(s, &actor, &cheque_no)).await?;
    Ok(HttpResponse::Ok().json(cheque))
}

#[utoipa::path(
    delete,
    path = "/api/cheque/{cheque_no}",
    params(
        ("cheque_no" = String, Path, description = "Cheque number")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 403, description = "Forbidden", body = Object),
        (status = 404, description = "Cheque not found", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_role" = [])
    ),
    tag = "Cheque"
)]
pub async fn delete_cheque(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let cheque_no = path.into_inner();
    with_store(&store, move |s| finance::delete_cheque(s, &actor, &cheque_no)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
