//! Integration tests for the reactivation API surface.
//!
//! These tests require a running winback server (cargo run -p
//! winback-server). Validation-path tests work against an unconfigured
//! server; the customer fetch test needs Shopify credentials.
//!
//! Run with: cargo test -p winback-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use winback_core::{RuleConfig, TierRule};

/// Base URL for the winback API (configurable via environment).
fn base_url() -> String {
    std::env::var("WINBACK_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

fn client() -> Client {
    Client::new()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_health_reports_credential_flags_and_limits() {
    let resp = client()
        .get(format!("{}/api/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse health body");

    assert_eq!(body["status"], "ok");
    assert!(body["credentials"]["shopifyStoreDomain"].is_boolean());
    assert!(body["credentials"]["mailerliteApiKey"].is_boolean());
    assert!(body["credentials"]["openaiApiKey"].is_boolean());
    assert!(body["limits"]["maxCustomersAnalyzed"].is_u64());
    assert!(body["model"].is_string());
}

// ============================================================================
// Validation paths (no credentials needed)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_discounts_rejects_empty_recommendations() {
    let resp = client()
        .post(format!("{}/api/shopify/discounts", base_url()))
        .json(&json!({"recommendations": []}))
        .send()
        .await
        .expect("Failed to reach discounts endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].as_str().expect("error string").contains("recommendations"));
}

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_batch_rejects_missing_rule_config() {
    let resp = client()
        .post(format!("{}/api/reactivation/batch", base_url()))
        .json(&json!({"pricingStrategy": "balanced"}))
        .send()
        .await
        .expect("Failed to reach batch endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].as_str().expect("error string").contains("ruleConfig"));
}

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_batch_rejects_over_limit_discount_tier() {
    let rule_config = RuleConfig {
        tiers: vec![TierRule {
            discount_percent: Some(70),
            ..Default::default()
        }],
        default_tier: None,
    };

    let resp = client()
        .post(format!("{}/api/reactivation/batch", base_url()))
        .json(&json!({"ruleConfig": rule_config}))
        .send()
        .await
        .expect("Failed to reach batch endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_analyze_rejects_empty_segment() {
    let resp = client()
        .post(format!("{}/api/ai/analyze", base_url()))
        .json(&json!({"customerSegment": [], "pricingStrategy": "balanced"}))
        .send()
        .await
        .expect("Failed to reach analyze endpoint");

    // 400 either way: empty segment with a key configured, or missing key
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running winback server"]
async fn test_campaign_rejects_empty_selection() {
    let resp = client()
        .post(format!("{}/api/mailerlite/campaign", base_url()))
        .json(&json!({
            "campaignName": "Integration test",
            "selectedRecommendations": []
        }))
        .send()
        .await
        .expect("Failed to reach campaign endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Shopify-backed paths (need credentials on the server)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running winback server with Shopify credentials"]
async fn test_customers_returns_metrics_shape() {
    let resp = client()
        .get(format!("{}/api/shopify/customers", base_url()))
        .send()
        .await
        .expect("Failed to reach customers endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse customers body");

    let customers = body["customers"].as_array().expect("customers array");
    assert_eq!(body["total"].as_u64().expect("total") as usize, customers.len());
    assert!(body["maxAnalyzed"].as_u64().expect("maxAnalyzed") > 0);

    if let Some(first) = customers.first() {
        assert!(first["id"].is_u64());
        assert!(first["totalOrders"].is_u64());
        assert!(first["daysSinceLastOrder"].is_i64());
        // totalSpent serializes as a decimal string
        assert!(first["totalSpent"].is_string());
    }
}
