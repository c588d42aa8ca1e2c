//! LLM segment analysis endpoint.
//!
//! Sends a customer segment and a pricing strategy to the chat model and
//! returns the model's JSON analysis verbatim. The model is instructed to
//! answer with a single JSON document; a reply that does not parse is a
//! server error, not a client one.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use winback_core::CustomerMetrics;

use crate::error::AppError;
use crate::openai::{ChatMessage, OpenAiError, extract_json};
use crate::state::AppState;

/// Request body for POST `/api/ai/analyze`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub customer_segment: Vec<CustomerMetrics>,
    #[serde(default)]
    pub pricing_strategy: Option<String>,
    /// Free-form strategy context forwarded into the prompt.
    #[serde(default)]
    pub strategy_info: Option<serde_json::Value>,
}

const SYSTEM_PROMPT: &str = "You are a pricing analyst for an e-commerce store \
running a customer reactivation campaign. You receive aggregate metrics for a \
segment of lapsed customers and a pricing strategy. Respond with a single JSON \
object, no prose and no Markdown, with exactly these keys: \
\"customerRecommendations\" (array of per-customer objects with customerId, \
discountPercent, rationale, messagingAngle), \"campaignProjection\" (object \
with expectedRecoveredRevenue, expectedRedemptionRate), and \
\"strategicInsights\" (array of strings).";

/// POST `/api/ai/analyze`
#[instrument(skip(state, request), fields(segment_size = request.customer_segment.len()))]
pub async fn analyze_segment(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let openai = state.openai().ok_or_else(|| {
        AppError::BadRequest("OpenAI credentials not configured (OPENAI_API_KEY)".to_string())
    })?;

    if request.customer_segment.is_empty() {
        return Err(AppError::BadRequest(
            "customerSegment must not be empty".to_string(),
        ));
    }

    // Cap the segment forwarded to the model; the dashboard may send more.
    let cap = state.config().limits.max_customers_for_ai;
    let mut segment = request.customer_segment;
    if segment.len() > cap {
        tracing::debug!(
            sent = segment.len(),
            cap,
            "Truncating customer segment for analysis"
        );
        segment.truncate(cap);
    }

    let user_prompt = build_user_prompt(
        &segment,
        request.pricing_strategy.as_deref(),
        request.strategy_info.as_ref(),
    )
    .map_err(|e| AppError::Internal(format!("Failed to serialize segment: {e}")))?;

    let reply = openai
        .chat_json(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
        .await?;

    let analysis: serde_json::Value = serde_json::from_str(extract_json(&reply))
        .map_err(|_| OpenAiError::Parse("model reply was not valid JSON".to_string()))?;

    Ok(Json(analysis))
}

/// Assemble the user prompt from the segment and strategy context.
fn build_user_prompt(
    segment: &[CustomerMetrics],
    pricing_strategy: Option<&str>,
    strategy_info: Option<&serde_json::Value>,
) -> Result<String, serde_json::Error> {
    let mut prompt = format!(
        "Pricing strategy: {}\n",
        pricing_strategy.unwrap_or("balanced")
    );

    if let Some(info) = strategy_info {
        prompt.push_str("Strategy context: ");
        prompt.push_str(&serde_json::to_string(info)?);
        prompt.push('\n');
    }

    prompt.push_str("Customer segment:\n");
    prompt.push_str(&serde_json::to_string(segment)?);
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: AnalyzeRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(request.customer_segment.is_empty());
        assert!(request.pricing_strategy.is_none());
        assert!(request.strategy_info.is_none());
    }

    #[test]
    fn test_build_user_prompt_includes_strategy() {
        let info = serde_json::json!({"aggressiveness": "high"});
        let prompt =
            build_user_prompt(&[], Some("aggressive"), Some(&info)).expect("build prompt");
        assert!(prompt.contains("Pricing strategy: aggressive"));
        assert!(prompt.contains("aggressiveness"));
        assert!(prompt.contains("Customer segment:"));
    }

    #[test]
    fn test_build_user_prompt_default_strategy() {
        let prompt = build_user_prompt(&[], None, None).expect("build prompt");
        assert!(prompt.contains("Pricing strategy: balanced"));
    }
}
