//! Shopify Admin REST API client.
//!
//! Covers the three Shopify surfaces the workflow touches:
//! - Customers list with cursor pagination ([`AdminClient::fetch_customers`])
//! - Price rule creation
//! - Discount code creation under a price rule
//!
//! # API Reference
//!
//! - Base URL: `https://{store}/admin/api/{version}`
//! - Authentication: `X-Shopify-Access-Token` header
//! - Pagination: opaque `page_info` cursor in the `Link` response header

mod client;
mod customers;
mod discounts;
pub mod pagination;
mod types;

pub use client::AdminClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response; the message is the response body.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Upstream response body.
        message: String,
    },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Unauthorized (invalid or expired access token).
    #[error("Unauthorized: invalid access token")]
    Unauthorized,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::Api {
            status: 422,
            message: "{\"errors\":{\"price_rule\":\"invalid\"}}".to_string(),
        };
        assert!(err.to_string().starts_with("API error: 422"));
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
