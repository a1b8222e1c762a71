use crate::{
    api::{attendance, cheque, employee, leave_request, overtime, payroll, report},
    auth::middleware::session_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, get, middleware::from_fn, web};
use anyhow::{Result, anyhow};
use serde_json::json;
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    pub protected: Limiter,
    /// Tighter budget for approve/reject calls.
    pub write: Limiter,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
            write: Arc::new(build_limiter(config.rate_write_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit: {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiters: &Limiters) {
    let write_limiter = limiters.write.clone();

    // Public routes
    cfg.service(index);

    // Session-protected routes
    cfg.service(
        web::scope(api_prefix)
            .wrap(from_fn(session_middleware))
            .wrap(limiters.protected.clone()) // rate limiting
            .service(
                web::scope("/employee")
                    // /employee
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(web::resource("/pending").route(web::get().to(employee::list_pending)))
                    .service(
                        web::resource("/pending/count").route(web::get().to(employee::pending_count)),
                    )
                    // /employee/pending/{id}/approve
                    .service(
                        web::resource("/pending/{id}/approve")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(employee::approve_employee)),
                    )
                    // /employee/pending/{id}/reject
                    .service(
                        web::resource("/pending/{id}/reject")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(employee::reject_employee)),
                    )
                    .service(web::resource("/history").route(web::get().to(employee::employee_history)))
                    .service(web::resource("/export").route(web::get().to(employee::export_employees)))
                    // /employee/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(web::resource("/pending").route(web::get().to(leave_request::pending_leaves)))
                    .service(web::resource("/current").route(web::get().to(leave_request::current_leaves)))
                    .service(web::resource("/history").route(web::get().to(leave_request::leave_history)))
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    // /overtime
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::overtime_list))
                            .route(web::post().to(overtime::create_overtime)),
                    )
                    .service(web::resource("/pending").route(web::get().to(overtime::pending_overtime)))
                    .service(web::resource("/current").route(web::get().to(overtime::current_overtime)))
                    .service(web::resource("/history").route(web::get().to(overtime::overtime_history)))
                    // /overtime/{id}
                    .service(web::resource("/{id}").route(web::get().to(overtime::get_overtime)))
                    .service(
                        web::resource("/{id}/approve")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(overtime::approve_overtime)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .wrap(write_limiter.clone())
                            .route(web::put().to(overtime::reject_overtime)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::put().to(attendance::check_out))
                            .route(web::post().to(attendance::check_in))
                            .route(web::get().to(attendance::attendance_list)),
                    )
                    .service(web::resource("/hours").route(web::get().to(attendance::total_hours))),
            )
            .service(
                web::scope("/payroll")
                    .service(web::resource("/summary").route(web::post().to(payroll::payroll_summary)))
                    // /payroll/payments
                    .service(
                        web::resource("/payments")
                            .route(web::post().to(payroll::create_payment))
                            .route(web::get().to(payroll::list_payments)),
                    ),
            )
            .service(
                web::scope("/cheque")
                    .service(
                        web::resource("")
                            .route(web::post().to(cheque::create_cheque))
                            .route(web::get().to(cheque::list_cheques)),
                    )
                    // /cheque/{cheque_no}
                    .service(
                        web::resource("/{cheque_no}")
                            .route(web::get().to(cheque::get_cheque))
                            .route(web::delete().to(cheque::delete_cheque)),
                    ),
            )
            .service(
                web::scope("/report")
                    .service(
                        web::resource("")
                            .route(web::post().to(report::create_report))
                            .route(web::get().to(report::list_reports)),
                    )
                    // /report/{report_no}
                    .service(
                        web::resource("/{report_no}")
                            .route(web::get().to(report::get_report))
                            .route(web::delete().to(report::delete_report)),
                    ),
            ),
    );
}
