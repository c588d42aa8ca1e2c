//! One-shot reactivation batch: fetch customers, reduce to metrics, run the
//! tier matcher, filter to actionable recommendations, and optionally hand
//! the result to MailerLite.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use winback_core::{CustomerMetrics, Recommendation, RuleConfig, filter_recommendations};

use crate::error::AppError;
use crate::routes::campaign::{CampaignResult, run_campaign};
use crate::state::AppState;

/// How many recommendations the response echoes back for review.
const SAMPLE_SIZE: usize = 20;

/// Request body for POST `/api/reactivation/batch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default)]
    pub pricing_strategy: Option<String>,
    pub rule_config: Option<RuleConfig>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub max_customers: Option<usize>,
    #[serde(default)]
    pub send_to_mailerlite: bool,
}

/// Response for POST `/api/reactivation/batch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    pub total_customers_fetched: usize,
    pub total_recommendations: usize,
    /// First [`SAMPLE_SIZE`] recommendations, for operator review.
    pub sample_recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailer_lite_result: Option<CampaignResult>,
}

/// POST `/api/reactivation/batch`
///
/// The rule config is validated at the boundary; a config that fails
/// validation never reaches the matcher.
#[instrument(skip(state, request))]
pub async fn run_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let rule_config = request
        .rule_config
        .ok_or_else(|| AppError::BadRequest("ruleConfig is required".to_string()))?;
    rule_config.validate()?;

    let shopify = state.shopify().ok_or_else(|| {
        AppError::BadRequest(
            "Shopify credentials not configured (SHOPIFY_STORE_DOMAIN, SHOPIFY_ACCESS_TOKEN)"
                .to_string(),
        )
    })?;

    let cap = state.config().limits.max_batch_customers;
    let limit = request.max_customers.map_or(cap, |n| n.min(cap));

    tracing::info!(
        strategy = request.pricing_strategy.as_deref().unwrap_or("balanced"),
        limit,
        send_to_mailerlite = request.send_to_mailerlite,
        "Starting reactivation batch"
    );

    let raw_customers = shopify.fetch_customers(limit).await?;
    let total_customers_fetched = raw_customers.len();

    let now = Utc::now();
    let recommendations: Vec<Recommendation> = raw_customers
        .iter()
        .map(|raw| CustomerMetrics::from_raw(raw, now))
        .filter_map(|metrics| rule_config.match_customer(&metrics))
        .collect();
    let recommendations = filter_recommendations(recommendations);

    tracing::info!(
        fetched = total_customers_fetched,
        recommendations = recommendations.len(),
        "Batch matching finished"
    );

    let mailer_lite_result = if request.send_to_mailerlite && !recommendations.is_empty() {
        let mailerlite = state.mailerlite().ok_or_else(|| {
            AppError::BadRequest(
                "sendToMailerLite requested but MAILERLITE_API_KEY is not configured".to_string(),
            )
        })?;
        let campaign_name = request
            .campaign_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(
                || format!("Reactivation {}", now.format("%Y-%m-%d")),
                ToString::to_string,
            );
        Some(run_campaign(mailerlite, &campaign_name, &recommendations).await?)
    } else {
        None
    };

    let total_recommendations = recommendations.len();
    let mut sample_recommendations = recommendations;
    sample_recommendations.truncate(SAMPLE_SIZE);

    Ok(Json(BatchResponse {
        success: true,
        total_customers_fetched,
        total_recommendations,
        sample_recommendations,
        mailer_lite_result,
    }))
}
