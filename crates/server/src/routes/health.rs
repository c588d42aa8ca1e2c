//! Health and configuration status endpoint.
//!
//! The dashboard polls this to decide which workflow buttons to enable, so
//! it reports which credentials are configured without exposing any of them.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub credentials: CredentialFlags,
    /// Configured store domain, when Shopify credentials are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    /// Chat model used for analysis.
    pub model: String,
    pub limits: LimitsView,
}

/// Which of the four credentials are configured.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialFlags {
    pub shopify_store_domain: bool,
    pub shopify_access_token: bool,
    pub mailerlite_api_key: bool,
    pub openai_api_key: bool,
}

/// The configured workflow size caps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsView {
    pub max_customers_analyzed: usize,
    pub max_customers_for_ai: usize,
    pub max_batch_customers: usize,
}

/// GET `/api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();
    let shopify_configured = config.shopify.is_some();

    Json(HealthResponse {
        status: "ok",
        credentials: CredentialFlags {
            shopify_store_domain: shopify_configured,
            shopify_access_token: shopify_configured,
            mailerlite_api_key: config.mailerlite.is_some(),
            openai_api_key: config.openai.is_some(),
        },
        store: config.shopify.as_ref().map(|s| s.store.clone()),
        model: config.model_name().to_string(),
        limits: LimitsView {
            max_customers_analyzed: config.limits.max_customers_analyzed,
            max_customers_for_ai: config.limits.max_customers_for_ai,
            max_batch_customers: config.limits.max_batch_customers,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serializes_camel_case() {
        let response = HealthResponse {
            status: "ok",
            credentials: CredentialFlags {
                shopify_store_domain: true,
                shopify_access_token: true,
                mailerlite_api_key: false,
                openai_api_key: true,
            },
            store: Some("test.myshopify.com".to_string()),
            model: "gpt-4o-mini".to_string(),
            limits: LimitsView {
                max_customers_analyzed: 1000,
                max_customers_for_ai: 250,
                max_batch_customers: 10_000,
            },
        };

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["credentials"]["shopifyStoreDomain"], true);
        assert_eq!(json["credentials"]["mailerliteApiKey"], false);
        assert_eq!(json["limits"]["maxCustomersForAi"], 250);
        assert_eq!(json["store"], "test.myshopify.com");
    }
}
