//! Extractor for the authenticated dashboard admin.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use tracing::{instrument, trace};
use utoipa::ToSchema;

use crate::{AppState, auth::session, config::Config, errors::Error};

/// The admin behind a valid session cookie.
///
/// Using this as a handler argument makes the route require a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentAdmin {
    pub email: String,
}

/// Look for the session cookie and verify it.
///
/// Returns:
/// - None: No valid session cookie present
/// - Some(Ok(admin)): Valid JWT found and verified
/// - Some(Err(error)): Cookie header present but unreadable
fn try_jwt_session_auth(parts: &Parts, config: &Config) -> Option<Result<CurrentAdmin, Error>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let Some((name, value)) = cookie.trim().split_once('=') else {
            continue;
        };
        if name != cookie_name {
            continue;
        }
        match session::verify_session_token(value, config) {
            Ok(admin) => return Some(Ok(admin)),
            // Expired or foreign tokens are expected; keep looking
            Err(e) => trace!("Ignoring invalid session cookie: {e}"),
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match try_jwt_session_auth(parts, &state.config) {
            Some(Ok(admin)) => Ok(admin),
            Some(Err(e)) => Err(e),
            None => Err(Error::Unauthenticated { message: None }),
        }
    }
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, config: &Config) -> String {
    let session = &config.session;
    let secure = if session.cookie_secure { "; Secure" } else { "" };

    format!(
        "{}={}; Path=/; HttpOnly{}; SameSite={}; Max-Age={}",
        session.cookie_name,
        token,
        secure,
        session.cookie_same_site,
        session.timeout.as_secs()
    )
}

/// `Set-Cookie` value that clears the session
pub fn expired_session_cookie(config: &Config) -> String {
    let session = &config.session;
    let secure = if session.cookie_secure { "; Secure" } else { "" };

    format!(
        "{}=; Path=/; HttpOnly{}; SameSite={}; Max-Age=0",
        session.cookie_name, secure, session.cookie_same_site
    )
}
