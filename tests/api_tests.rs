use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use hrm_records::store::Store;

mod common;

use common::{ada_json, anonymous, app_routes, as_role};

#[actix_web::test]
async fn test_index_is_public() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = anonymous(test::TestRequest::get().uri("/")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn test_api_requires_session_role() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = anonymous(test::TestRequest::get().uri("/api/employee")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Missing X-User-Role header"}));
}

#[actix_web::test]
async fn test_employee_approval_over_http() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    // Arrange: an employee submits Ada
    let req = as_role(test::TestRequest::post().uri("/api/employee"), "employee")
        .set_json(ada_json())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], json!("EMP1001"));
    assert_eq!(body["queued"], json!(true));
    assert_eq!(body["message"], json!("Employee submitted for approval"));

    let req = as_role(test::TestRequest::get().uri("/api/employee/pending/count"), "manager")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"count": 1}));

    // Act: the employee may not approve
    let req = as_role(
        test::TestRequest::put().uri("/api/employee/pending/EMP1001/approve"),
        "employee",
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // a manager can
    let req = as_role(
        test::TestRequest::put().uri("/api/employee/pending/EMP1001/approve"),
        "manager",
    )
    .set_json(json!({"comments": "Welcome aboard"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Employee approved"));
    assert_eq!(body["employee"]["status"], json!("approved"));
    assert_eq!(body["employee"]["decidedBy"], json!("test-manager"));

    // Assert: live record is listed
    let req = as_role(test::TestRequest::get().uri("/api/employee"), "employee").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["data"][0]["id"], json!("EMP1001"));
}

#[actix_web::test]
async fn test_error_statuses() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = as_role(test::TestRequest::get().uri("/api/employee/EMP9999"), "manager")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Employee EMP9999 not found"}));

    let req = as_role(test::TestRequest::post().uri("/api/employee"), "employee")
        .set_json(json!({"firstName": "Ada"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // reject, then try to approve the same record
    let req = as_role(test::TestRequest::post().uri("/api/employee"), "employee")
        .set_json(ada_json())
        .to_request();
    test::call_service(&app, req).await;
    let req = as_role(
        test::TestRequest::put().uri("/api/employee/pending/EMP1001/reject"),
        "admin",
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = as_role(
        test::TestRequest::put().uri("/api/employee/pending/EMP1001/approve"),
        "admin",
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_leave_request_over_http() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = as_role(test::TestRequest::post().uri("/api/employee"), "manager")
        .set_json(ada_json())
        .to_request();
    test::call_service(&app, req).await;

    let req = as_role(test::TestRequest::post().uri("/api/leave"), "employee")
        .set_json(json!({
            "employeeId": "EMP1001",
            "startDate": "2026-03-02",
            "endDate": "2026-03-04",
            "reason": "Family visit"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], json!("LR1001"));
    assert_eq!(body["status"], json!("PENDING"));

    let req = as_role(test::TestRequest::get().uri("/api/leave/pending"), "manager").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let req = as_role(test::TestRequest::put().uri("/api/leave/LR1001/approve"), "manager")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request"]["status"], json!("APPROVED"));
    assert_eq!(body["notification"]["subject"], json!("Leave Request APPROVED"));

    let req = as_role(test::TestRequest::get().uri("/api/leave/current"), "employee").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["id"], json!("LR1001"));
}

#[actix_web::test]
async fn test_export_returns_csv() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = as_role(test::TestRequest::post().uri("/api/employee"), "admin")
        .set_json(ada_json())
        .to_request();
    test::call_service(&app, req).await;

    let req = as_role(test::TestRequest::get().uri("/api/employee/export"), "employee")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = as_role(test::TestRequest::get().uri("/api/employee/export"), "manager")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    assert!(
        resp.headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("employees_export_"))
    );

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("id,firstName,lastName,"));
}

#[actix_web::test]
async fn test_cheque_over_http() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    let req = as_role(test::TestRequest::post().uri("/api/employee"), "manager")
        .set_json(ada_json())
        .to_request();
    test::call_service(&app, req).await;

    let req = as_role(test::TestRequest::post().uri("/api/cheque"), "accountant")
        .set_json(json!({"payeeId": "EMP1001"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cheque"]["chequeNo"], json!("CHQ1001"));
    assert_eq!(body["cheque"]["amount"], json!("50000"));

    let req = as_role(test::TestRequest::get().uri("/api/cheque"), "employee").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_pending_queue_hides_rejections_by_default() {
    let app = test::init_service(
        App::new().configure(app_routes(web::Data::new(Store::in_memory()))),
    )
    .await;

    for _ in 0..2 {
        let req = as_role(test::TestRequest::post().uri("/api/employee"), "employee")
            .set_json(ada_json())
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = as_role(
        test::TestRequest::put().uri("/api/employee/pending/EMP1001/reject"),
        "manager",
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = as_role(test::TestRequest::get().uri("/api/employee/pending"), "manager")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], json!("EMP1002"));
    assert_eq!(body[0]["status"], json!("pending"));

    let req = as_role(
        test::TestRequest::get().uri("/api/employee/pending?status=rejected"),
        "manager",
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], json!("EMP1001"));
}
