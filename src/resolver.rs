//! Short-link redirect resolution
//!
//! The short-link namespace is every single-segment path on the public site,
//! minus [`RESERVED_SEGMENTS`] and anything under [`ADMIN_PREFIX`]:
//!
//! | request path      | outcome                                   |
//! |-------------------|-------------------------------------------|
//! | `/`               | site routing                              |
//! | `/promo1`         | 301 to the stored destination, if known   |
//! | `/promo1/`        | same as `/promo1`                         |
//! | `/promo1/extra`   | site routing                              |
//! | `/admin/...`      | site routing (management API)             |
//!
//! A new single-segment site route must be added to [`RESERVED_SEGMENTS`],
//! otherwise a short link with the same name would shadow it.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::database::AppState;
use crate::error::StoreError;
use crate::service::{is_path_charset, redirect_location};

/// Path prefix of the management area. Requests under it are never intercepted.
pub const ADMIN_PREFIX: &str = "/admin";

/// Single segments owned by the site itself
pub const RESERVED_SEGMENTS: &[&str] = &["admin"];

pub fn is_reserved_segment(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Returns the short-link candidate carried by a request path, if any.
///
/// Leading and trailing slashes are ignored. Empty and multi-segment paths
/// yield `None`, as do segments that could never have been created.
pub fn short_path_candidate(path: &str) -> Option<&str> {
    if is_admin_path(path) {
        return None;
    }

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() || trimmed.contains('/') {
        return None;
    }
    if is_reserved_segment(trimmed) || !is_path_charset(trimmed) {
        return None;
    }

    Some(trimmed)
}

/// Middleware that answers matching short paths with `301 Moved Permanently`.
///
/// Runs ahead of site routing. Any miss, including a storage failure, lets the
/// request continue to the normal routes so site navigation keeps working.
pub async fn resolve_short_link(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(candidate) = short_path_candidate(request.uri().path()) else {
        return next.run(request).await;
    };

    // One point-in-time read; a concurrent update or delete just wins or loses this request
    match state.links.store().find_by_path(candidate) {
        Ok(link) => {
            let location = redirect_location(&link.long_url)
                .and_then(|destination| HeaderValue::from_str(&destination).ok());
            match location {
                Some(location) => {
                    debug!(short_path = %link.short_path, ?location, "short link matched");
                    return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
                        .into_response();
                }
                None => {
                    error!(short_path = %link.short_path, long_url = %link.long_url, "destination is not a valid Location header");
                }
            }
        }
        Err(StoreError::NotFound) => {
            debug!(path = candidate, "no short link, falling through");
        }
        Err(err) => {
            error!(path = candidate, error = %err, "short link lookup failed, falling through");
        }
    }

    next.run(request).await
}
