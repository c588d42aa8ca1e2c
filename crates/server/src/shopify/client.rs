//! HTTP plumbing for the Shopify Admin REST client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;

use crate::config::ShopifyConfig;

use super::ShopifyError;
use super::pagination;

/// Shopify Admin REST API client.
///
/// Cheap to clone; the reqwest client and store identity live behind an
/// `Arc`. All requests go out sequentially - there is no concurrent fan-out
/// anywhere in this system.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    api_version: String,
}

impl AdminClient {
    /// Create a new Admin REST client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Shopify-Access-Token",
            HeaderValue::from_str(config.access_token.expose_secret())
                .map_err(|e| ShopifyError::Parse(format!("Invalid access token format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                store: config.store.clone(),
                api_version: config.api_version.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    fn url(&self, path_and_query: &str) -> String {
        format!(
            "https://{}/admin/api/{}{path_and_query}",
            self.inner.store, self.inner.api_version
        )
    }

    /// Execute a GET request, returning the parsed body together with the
    /// next `page_info` cursor from the `Link` header (if any).
    pub(crate) async fn get_paged<T: serde::de::DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<(T, Option<String>), ShopifyError> {
        let response = self
            .inner
            .client
            .get(self.url(path_and_query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error(response).await);
        }

        let next_cursor = response
            .headers()
            .get("Link")
            .and_then(|v| v.to_str().ok())
            .and_then(pagination::next_page_info);

        let body = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(format!("Failed to parse response: {e}")))?;

        Ok((body, next_cursor))
    }

    /// Execute a POST request to the Admin API.
    pub(crate) async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(format!("Failed to parse response: {e}")))
    }
}

/// Parse an error response from the Admin API.
async fn parse_error(response: reqwest::Response) -> ShopifyError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ShopifyError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return ShopifyError::Unauthorized;
    }

    // Surface the response body as the error detail - no retry.
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ShopifyError::Api { status, message }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("store", &self.inner.store)
            .field("api_version", &self.inner.api_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_client() -> AdminClient {
        AdminClient::new(&ShopifyConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            access_token: SecretString::from("shpat_test_token"),
        })
        .expect("client should build")
    }

    #[test]
    fn test_url_construction() {
        let client = test_client();
        assert_eq!(
            client.url("/customers.json?limit=50"),
            "https://test.myshopify.com/admin/api/2024-01/customers.json?limit=50"
        );
    }

    #[test]
    fn test_admin_client_is_clone_send_sync() {
        fn assert_clone_send_sync<T: Clone + Send + Sync>() {}
        assert_clone_send_sync::<AdminClient>();
    }
}
