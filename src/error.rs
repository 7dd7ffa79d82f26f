use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::client::CatalogError;

pub type RestResult<T> = Result<T, RestError>;

/// Classified request failures.
///
/// Each variant is tagged at the point the failure originates, so the
/// HTTP status taxonomy lives entirely in `status_code` and never has to be
/// re-derived from error message text downstream.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    ParseError(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Transport failure talking to the external catalog
    #[error("Failed to retrieve show details from the catalog. Cannot create subscription.")]
    UpstreamUnavailable,

    /// The catalog answered, but with unusable data
    #[error("Show details were incomplete. Cannot create subscription.")]
    IncompleteUpstreamData,

    /// The store refused a write that violates the persisted schema
    #[error("Subscription failed: internal schema mismatch.")]
    SchemaMismatch,

    #[error("Failed to send confirmation email")]
    FailedToSendEmail(#[source] anyhow::Error),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RestError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        let is_schema_violation = match &e {
            sqlx::Error::Database(db) => matches!(
                db.kind(),
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation
            ),
            _ => false,
        };

        if is_schema_violation {
            tracing::error!("Schema validation failed on write: {}", e);
            Self::SchemaMismatch
        } else {
            tracing::error!("Database error: {}", e);
            Self::InternalError("Database error".into())
        }
    }
}

impl From<CatalogError> for RestError {
    fn from(e: CatalogError) -> Self {
        tracing::error!("Catalog request failed: {}", e);
        Self::UpstreamUnavailable
    }
}

/// Sanitized envelope returned to the client for every failed request
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "emailSent")]
    email_sent: bool,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_)
            | Self::InvalidCredentials(_)
            | Self::IncompleteUpstreamData
            | Self::SchemaMismatch => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::FailedToSendEmail(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error.cause_chain = ?self, "Request failed: {}", self);

        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
            email_sent: false,
        })
    }
}
