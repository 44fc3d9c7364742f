//! HTTP request handlers for the management API and the public site
//!
//! Every management handler answers with an [`Envelope`]. Authentication and
//! the anti-forgery check happen in [`crate::middleware`] before these run.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rand::{distr::Alphanumeric, Rng};

use crate::database::AppState;
use crate::error::ApiError;
use crate::middleware::CSRF_COOKIE_NAME;
use crate::model::{
    CreateRequest, CreateResponse, DeleteRequest, Envelope, ListResponse, QrRequest, QrResponse,
    TokenResponse, UpdateRequest, UtmRequest, UtmResponse,
};
use crate::resolver::ADMIN_PREFIX;
use crate::tools::{build_utm_url, qr_image_url};

const CSRF_TOKEN_LEN: usize = 32;

/// JSON body extractor whose rejection is rendered as a failure envelope
/// instead of axum's plain-text response
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadInput(rejection.body_text())),
        }
    }
}

/// Issues a fresh anti-forgery token
///
/// The token comes back in the body and as the `csrf_token` cookie; later
/// `POST`s must send it again in the `X-CSRF-Token` header.
pub async fn issue_token() -> impl IntoResponse {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LEN)
        .map(char::from)
        .collect();

    let cookie = format!(
        "{}={}; Path={}; HttpOnly; SameSite=Strict",
        CSRF_COOKIE_NAME, token, ADMIN_PREFIX
    );

    (
        [(header::SET_COOKIE, cookie)],
        Json(Envelope::success(TokenResponse { token })),
    )
}

/// Creates a short link
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page", "custom_path": "promo1" }
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "data": { "id": 1, "short_path": "promo1", "short_url": "https://site/promo1" } }
/// ```
pub async fn create_link(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRequest>,
) -> Result<Json<Envelope<CreateResponse>>, ApiError> {
    let created = state.links.create_link(&payload.url, &payload.custom_path)?;

    Ok(Json(Envelope::success(CreateResponse {
        id: created.link.id,
        short_path: created.link.short_path,
        short_url: created.short_url,
    })))
}

/// Lists every link, newest first
pub async fn list_links(
    State(state): State<AppState>,
) -> Result<Json<Envelope<ListResponse>>, ApiError> {
    let urls = state.links.list_links()?;
    Ok(Json(Envelope::success(ListResponse { urls })))
}

pub async fn update_link(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.links.update_link(payload.id, &payload.long_url)?;
    Ok(Json(Envelope::done()))
}

pub async fn delete_link(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DeleteRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.links.delete_link(payload.id)?;
    Ok(Json(Envelope::done()))
}

/// Decorates a landing page URL with UTM campaign parameters
pub async fn build_utm(
    ApiJson(payload): ApiJson<UtmRequest>,
) -> Result<Json<Envelope<UtmResponse>>, ApiError> {
    let url = build_utm_url(&payload)
        .map_err(|_| ApiError::BadInput("Please enter a valid URL".to_string()))?;

    Ok(Json(Envelope::success(UtmResponse {
        url: url.to_string(),
    })))
}

/// Returns the third-party image URL that renders `data` as a QR code
pub async fn build_qr(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<QrRequest>,
) -> Result<Json<Envelope<QrResponse>>, ApiError> {
    let image_url = qr_image_url(&state.config.qr_api_url, &payload.data, payload.format)
        .map_err(|_| ApiError::BadInput("Please enter a valid URL".to_string()))?;

    Ok(Json(Envelope::success(QrResponse {
        image_url: image_url.to_string(),
    })))
}

/// Site home page
pub async fn home() -> &'static str {
    "shortlinks is running"
}

/// Normal site 404, also what a deleted or unknown short path ends up at
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
