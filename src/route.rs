//! Route definitions for the short-link service
//!
//! All routes are registered here, once, while the application is built.

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::database::AppState;
use crate::handler::{
    build_qr, build_utm, create_link, delete_link, home, issue_token, list_links, not_found,
    update_link,
};
use crate::middleware::{admin_auth, csrf_guard};
use crate::resolver::{resolve_short_link, ADMIN_PREFIX};

/// Creates and configures the application router
///
/// # Route Definitions
///
/// - `ANY /{short_path}` - Short-link redirect, checked before any route below
/// - `GET /` - Site home
/// - `GET /admin/api/token` - Issues an anti-forgery token (admin only)
/// - `POST /admin/api/{create,list,update,delete}` - Link management (admin + token)
/// - `POST /admin/api/{utm,qr}` - URL helper tools (admin + token)
///
/// # Example Usage
///
/// ```no_run
/// # use envconfig::Envconfig;
/// # use shortlinks::config::Config;
/// # use shortlinks::database::{init_db, AppState};
/// # use shortlinks::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// # let config = Config::init_from_env().unwrap();
/// let state = AppState::new(db, config);
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    // Mutating operations additionally need the double-submitted token
    let protected = Router::new()
        .route("/create", post(create_link))
        .route("/list", post(list_links))
        .route("/update", post(update_link))
        .route("/delete", post(delete_link))
        .route("/utm", post(build_utm))
        .route("/qr", post(build_qr))
        .route_layer(middleware::from_fn(csrf_guard));

    let admin_api = Router::new()
        .route("/token", get(issue_token))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    let site = Router::new()
        .route("/", get(home))
        .nest(&format!("{}/api", ADMIN_PREFIX), admin_api)
        .fallback(not_found)
        .with_state(state.clone());

    // The resolver wraps the whole site so it sees every request before routing
    Router::new()
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(state, resolve_short_link))
}
