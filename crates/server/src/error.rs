//! Unified error handling for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use winback_core::RuleError;

use crate::openai::OpenAiError;
use crate::services::mailerlite::MailerLiteError;
use crate::shopify::ShopifyError;

/// Application-level error type.
///
/// Taxonomy: configuration problems and invalid request bodies are 400 and
/// never retried; upstream API failures are 500 wrapping the upstream error
/// text. Per-item failures in batch loops never become an `AppError` - they
/// are collected into the response instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// MailerLite API operation failed.
    #[error("MailerLite error: {0}")]
    MailerLite(#[from] MailerLiteError),

    /// `OpenAI` API operation failed.
    #[error("OpenAI error: {0}")]
    OpenAi(#[from] OpenAiError),

    /// Rule config failed boundary validation.
    #[error("Invalid rule config: {0}")]
    Rules(#[from] RuleError),

    /// Bad request from client (including missing credentials).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to the dashboard.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Report server-side errors to Sentry
        if matches!(
            self,
            Self::Shopify(_) | Self::MailerLite(_) | Self::OpenAi(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) | Self::Rules(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(_) | Self::MailerLite(_) | Self::OpenAi(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Upstream error text is surfaced to the operator on purpose - this
        // is an internal tool and the upstream message is the diagnosis.
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
