use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    http::header::HeaderMap,
};
use futures::future::{Ready, ready};

use crate::model::role::{Actor, Role};

pub const ROLE_HEADER: &str = "X-User-Role";
pub const USER_HEADER: &str = "X-User-Name";

/// Shown in decision metadata when the client did not send a user name.
pub const UNKNOWN_USER: &str = "Unknown";

/// The signed-in user as reported by the client session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// `None` when the session carries no role at all.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let role = headers
            .get(ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|r| !r.is_empty())?;

        let username = headers
            .get(USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(UNKNOWN_USER);

        Some(AuthUser {
            username: username.to_string(),
            role: Role::from_session(role),
        })
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.username.clone(), self.role)
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by the session middleware on protected scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        match AuthUser::from_headers(req.headers()) {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("Missing session role"))),
        }
    }
}
