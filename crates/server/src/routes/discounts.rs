//! Discount code creation endpoint.
//!
//! Codes are created one at a time with a fixed pause between calls to stay
//! under the Shopify Admin API bucket. Per-code failures are collected into
//! the response rather than aborting the batch.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use winback_core::Recommendation;

use crate::error::AppError;
use crate::state::AppState;

/// Pause between consecutive price-rule creations.
const CREATE_DELAY: Duration = Duration::from_millis(500);

/// Request body for POST `/api/shopify/discounts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscountsRequest {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Response for POST `/api/shopify/discounts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscountsResponse {
    pub created_codes: Vec<String>,
    pub failed_codes: Vec<FailedCode>,
}

/// One recommendation whose code could not be created.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedCode {
    pub code: String,
    pub error: String,
}

/// POST `/api/shopify/discounts`
///
/// An empty recommendation list is a 400. Missing Shopify credentials are a
/// 500 here: the dashboard only offers this action after a successful fetch,
/// so their absence at this point is a server-side misconfiguration.
#[instrument(skip(state, request), fields(count = request.recommendations.len()))]
pub async fn create_discounts(
    State(state): State<AppState>,
    Json(request): Json<CreateDiscountsRequest>,
) -> Result<Json<CreateDiscountsResponse>, AppError> {
    if request.recommendations.is_empty() {
        return Err(AppError::BadRequest(
            "recommendations must not be empty".to_string(),
        ));
    }

    let shopify = state
        .shopify()
        .ok_or_else(|| AppError::Internal("Shopify credentials not configured".to_string()))?;

    let mut created_codes = Vec::new();
    let mut failed_codes = Vec::new();

    for (index, recommendation) in request.recommendations.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(CREATE_DELAY).await;
        }

        match shopify.create_discount(recommendation).await {
            Ok(code) => created_codes.push(code),
            Err(e) => {
                tracing::warn!(
                    code = %recommendation.discount_code,
                    error = %e,
                    "Discount code creation failed"
                );
                failed_codes.push(FailedCode {
                    code: recommendation.discount_code.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        created = created_codes.len(),
        failed = failed_codes.len(),
        "Discount batch finished"
    );

    Ok(Json(CreateDiscountsResponse {
        created_codes,
        failed_codes,
    }))
}
