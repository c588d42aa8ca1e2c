//! Customer listing endpoint: fetch raw records from Shopify and reduce
//! them to the metrics shape the dashboard and the tier matcher consume.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use winback_core::CustomerMetrics;

use crate::error::AppError;
use crate::state::AppState;

/// Response for GET `/api/shopify/customers`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersResponse {
    pub customers: Vec<CustomerMetrics>,
    pub total: usize,
    pub max_analyzed: usize,
}

/// GET `/api/shopify/customers`
///
/// Fetches up to `MAX_CUSTOMERS_ANALYZED` customers and reduces each to
/// [`CustomerMetrics`]. Missing Shopify credentials are a 400; upstream
/// failures are a 500.
#[instrument(skip(state))]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<CustomersResponse>, AppError> {
    let shopify = state.shopify().ok_or_else(|| {
        AppError::BadRequest(
            "Shopify credentials not configured (SHOPIFY_STORE_DOMAIN, SHOPIFY_ACCESS_TOKEN)"
                .to_string(),
        )
    })?;

    let max_analyzed = state.config().limits.max_customers_analyzed;
    let raw_customers = shopify.fetch_customers(max_analyzed).await?;

    let now = Utc::now();
    let customers: Vec<CustomerMetrics> = raw_customers
        .iter()
        .map(|raw| CustomerMetrics::from_raw(raw, now))
        .collect();

    tracing::info!(total = customers.len(), "Reduced customers to metrics");

    Ok(Json(CustomersResponse {
        total: customers.len(),
        max_analyzed,
        customers,
    }))
}
