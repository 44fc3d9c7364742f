//! Runtime configuration loaded from the process environment
//!
//! `main` loads an optional `.env` file first, so every value below can also
//! be placed there.

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    /// Server port number
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    /// Path to the redb database file
    #[envconfig(from = "DATABASE_URL", default = "data.db")]
    pub database_url: String,

    /// Public site address used when building short URLs (e.g. "https://example.com")
    #[envconfig(from = "PUBLIC_BASE_URL", default = "http://localhost:8080")]
    pub public_base_url: String,

    /// Administrator secret for the management API.
    /// Empty means the management API rejects every request.
    #[envconfig(from = "ADMIN_TOKEN", default = "")]
    pub admin_token: String,

    /// Third-party endpoint that renders QR images
    #[envconfig(
        from = "QR_API_URL",
        default = "https://api.qrserver.com/v1/create-qr-code/"
    )]
    pub qr_api_url: String,
}
