use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::database::AppState;
use crate::error::ApiError;

/// Cookie holding the anti-forgery token issued by `GET /admin/api/token`
pub const CSRF_COOKIE_NAME: &str = "csrf_token";

/// Header every management `POST` must echo the cookie value in
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Middleware that admits only administrators to the management API
///
/// The `Authorization` header must carry the configured admin token, either
/// raw or as `Bearer <token>`. With no admin token configured nobody gets in.
pub async fn admin_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let admin_token = state.config.admin_token.as_str();
    if admin_token.is_empty() {
        warn!("management request rejected: ADMIN_TOKEN is not configured");
        return Err(ApiError::Unauthorized.into_response());
    }

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value));

    match presented {
        Some(token) if constant_time_eq(token, admin_token) => Ok(next.run(request).await),
        Some(_) => {
            warn!("management request rejected: admin token mismatch");
            Err(ApiError::Unauthorized.into_response())
        }
        None => {
            warn!("management request rejected: missing authorization header");
            Err(ApiError::Unauthorized.into_response())
        }
    }
}

/// Middleware that checks the double-submitted anti-forgery token
///
/// The `X-CSRF-Token` header has to match the `csrf_token` cookie. Runs before
/// any management handler so a rejected request has no side effects.
pub async fn csrf_guard(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let cookie_token = cookie_value(&headers, CSRF_COOKIE_NAME);
    let header_token = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) if !cookie.is_empty() && constant_time_eq(cookie, header) => {
            Ok(next.run(request).await)
        }
        (None, _) => {
            warn!("CSRF cookie not found");
            Err(ApiError::Unauthorized.into_response())
        }
        (_, None) => {
            warn!("{} header not found", CSRF_HEADER_NAME);
            Err(ApiError::Unauthorized.into_response())
        }
        _ => {
            warn!("CSRF token mismatch");
            Err(ApiError::Unauthorized.into_response())
        }
    }
}

/// Looks up one cookie across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
