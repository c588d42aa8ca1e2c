//! MailerLite API client for reactivation email campaigns.
//!
//! Covers the three operations the reactivation workflow needs: creating a
//! subscriber group, upserting subscribers into it with their discount
//! fields, and creating a draft email campaign scoped to the group.
//!
//! # API Reference
//!
//! - Base URL: `https://connect.mailerlite.com/api`
//! - Authentication: `Authorization: Bearer <token>`

mod campaigns;
mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::MailerLiteConfig;

/// MailerLite API base URL.
const BASE_URL: &str = "https://connect.mailerlite.com/api";

/// Errors that can occur when interacting with the MailerLite API.
#[derive(Debug, Error)]
pub enum MailerLiteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by MailerLite.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unauthorized (invalid API token).
    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

/// MailerLite API client.
///
/// Cheap to clone; the underlying HTTP client and auth header are shared.
#[derive(Clone)]
pub struct MailerLiteClient {
    inner: Arc<MailerLiteClientInner>,
}

struct MailerLiteClientInner {
    client: reqwest::Client,
}

impl MailerLiteClient {
    /// Create a new MailerLite API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailerLiteConfig) -> Result<Self, MailerLiteError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MailerLiteError::Parse(format!("Invalid API token format: {e}")))?,
        );

        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(MailerLiteClientInner { client }),
        })
    }

    /// Execute a POST request to the MailerLite API.
    pub(crate) async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, MailerLiteError> {
        let url = format!("{BASE_URL}{path}");
        let response = self.inner.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }
}

/// Handle API response and parse JSON.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MailerLiteError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| MailerLiteError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Parse error response from the MailerLite API.
async fn parse_error(response: reqwest::Response) -> MailerLiteError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return MailerLiteError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return MailerLiteError::Unauthorized;
    }

    if status == 404 {
        return MailerLiteError::NotFound("Resource not found".to_string());
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    MailerLiteError::Api { status, message }
}

impl std::fmt::Debug for MailerLiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerLiteClient").finish_non_exhaustive()
    }
}
