//! HTTP route handlers for the reactivation API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health               - Credential flags, store, model, limits
//! GET  /api/shopify/customers    - Fetch + reduce customers to metrics
//! POST /api/ai/analyze           - LLM analysis of a customer segment
//! POST /api/glp1/plan            - LLM-generated treatment plan HTML
//! POST /api/shopify/discounts    - Create discount codes (serial, throttled)
//! POST /api/mailerlite/campaign  - Group + subscribers + draft campaign
//! POST /api/reactivation/batch   - Fetch -> match -> filter -> optional send
//! ```

pub mod analyze;
pub mod batch;
pub mod campaign;
pub mod customers;
pub mod discounts;
pub mod health;
pub mod plan;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/shopify/customers", get(customers::list_customers))
        .route("/api/ai/analyze", post(analyze::analyze_segment))
        .route("/api/glp1/plan", post(plan::generate_plan))
        .route("/api/shopify/discounts", post(discounts::create_discounts))
        .route("/api/mailerlite/campaign", post(campaign::create_campaign))
        .route("/api/reactivation/batch", post(batch::run_batch))
}
