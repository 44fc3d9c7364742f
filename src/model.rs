//! Data models for the short-link service
//!
//! This module defines the persisted [`Link`] record, the request/response
//! bodies of the management API, and the success/failure envelope every
//! management response is wrapped in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted short path, matching the `short_path` column width
pub const MAX_PATH_LEN: usize = 100;

/// A short path and the destination it redirects to
///
/// Stored as JSON in the `links_v1` table, keyed by `id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Assigned on creation, never reused
    pub id: u64,

    /// Single path segment matching `[A-Za-z0-9-]+`, immutable
    pub short_path: String,

    /// Destination as submitted; a scheme is added at redirect time if missing
    pub long_url: String,

    pub created_at: DateTime<Utc>,

    /// Kept for response-shape compatibility; always zero
    #[serde(default)]
    pub clicks: u64,
}

/// Uniform management API envelope
///
/// ```json
/// { "success": true, "data": { "short_url": "https://example.com/promo" } }
/// { "success": false, "data": { "message": "Invalid custom path format" } }
/// ```
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
        }
    }

    pub fn failure(data: T) -> Self {
        Envelope {
            success: false,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Success without a payload, serialized as `{"success": true}`
    pub fn done() -> Self {
        Envelope {
            success: true,
            data: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageBody {
    pub message: String,
}

/// Request payload for creating a short link
///
/// # Example
/// ```json
/// { "url": "https://example.com/landing?utm_source=qr", "custom_path": "spring-promo" }
/// ```
#[derive(Deserialize, Debug)]
pub struct CreateRequest {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub custom_path: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateResponse {
    pub id: u64,
    pub short_path: String,
    pub short_url: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse {
    pub urls: Vec<Link>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateRequest {
    pub id: u64,

    #[serde(default)]
    pub long_url: String,
}

#[derive(Deserialize, Debug)]
pub struct DeleteRequest {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

/// Campaign parameters appended to a landing page URL
#[derive(Deserialize, Debug, Default)]
pub struct UtmRequest {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub campaign: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UtmResponse {
    pub url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

impl QrFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrFormat::Png => "png",
            QrFormat::Svg => "svg",
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct QrRequest {
    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub format: QrFormat,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QrResponse {
    pub image_url: String,
}
