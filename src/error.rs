//! Error types for every layer of the service
//!
//! - [`StoreError`] comes out of the redb-backed link store
//! - [`LinkError`] is what the link service reports to its callers
//! - [`ApiError`] is rendered by the management API as a failure envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::model::{Envelope, MessageBody};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("short path {0:?} is already taken")]
    DuplicatePath(String),
    #[error("link not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] redb::Error),
    #[error("corrupt link record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(err: $ty) -> Self {
                    StoreError::Storage(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("{0}")]
    Validation(String),
    /// Raised both by the pre-check and by the store's unique index
    #[error("This custom path is already in use")]
    DuplicatePath,
    #[error("Link not found")]
    NotFound,
    #[error("Database error occurred")]
    Storage(#[source] StoreError),
}

impl LinkError {
    pub fn validation(message: impl Into<String>) -> Self {
        LinkError::Validation(message.into())
    }
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePath(_) => LinkError::DuplicatePath,
            StoreError::NotFound => LinkError::NotFound,
            other => LinkError::Storage(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid or missing security token")]
    Unauthorized,
    #[error("{0}")]
    BadInput(String),
    #[error(transparent)]
    Link(#[from] LinkError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Link(LinkError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            // Business outcomes travel as a successful transport with `success: false`
            ApiError::BadInput(_) | ApiError::Link(_) => StatusCode::OK,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Link(LinkError::Storage(source)) = &self {
            error!(error = %source, "link storage failure");
        }

        let body = Envelope::failure(MessageBody {
            message: self.to_string(),
        });

        (self.status(), Json(body)).into_response()
    }
}
