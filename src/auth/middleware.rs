use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
};
use serde_json::json;

use crate::auth::session::{AuthUser, ROLE_HEADER};

/// Rejects requests without a session role and stashes the session user for
/// the handlers.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let user = match AuthUser::from_headers(req.headers()) {
        Some(user) => user,
        None => {
            tracing::debug!(path = %req.path(), "Request without session role");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"message": format!("Missing {ROLE_HEADER} header")}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(user);

    next.call(req).await
}
