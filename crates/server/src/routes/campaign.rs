//! MailerLite campaign endpoint: create a group, upsert the selected
//! recommendations as subscribers, then create a draft campaign scoped to
//! the group. Subscriber failures are counted and skipped, not fatal.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use winback_core::Recommendation;

use crate::error::AppError;
use crate::services::mailerlite::{MailerLiteClient, MailerLiteError, SubscriberFields};
use crate::state::AppState;

/// Request body for POST `/api/mailerlite/campaign`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub campaign_name: String,
    #[serde(default)]
    pub pricing_strategy: Option<String>,
    #[serde(default)]
    pub selected_recommendations: Vec<Recommendation>,
}

/// Result of one campaign creation run, also embedded in the batch response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResult {
    pub success: bool,
    /// Subscribers upserted into the group.
    pub added_count: usize,
    /// Recommendations skipped (no email) or whose upsert failed.
    pub skipped_count: usize,
    pub group_id: String,
    pub campaign_id: String,
}

/// POST `/api/mailerlite/campaign`
#[instrument(skip(state, request), fields(campaign = %request.campaign_name))]
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CampaignRequest>,
) -> Result<Json<CampaignResult>, AppError> {
    let mailerlite = state.mailerlite().ok_or_else(|| {
        AppError::BadRequest("MailerLite credentials not configured (MAILERLITE_API_KEY)".to_string())
    })?;

    if request.campaign_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "campaignName must not be empty".to_string(),
        ));
    }
    if request.selected_recommendations.is_empty() {
        return Err(AppError::BadRequest(
            "selectedRecommendations must not be empty".to_string(),
        ));
    }

    tracing::info!(
        strategy = request.pricing_strategy.as_deref().unwrap_or("balanced"),
        recommendations = request.selected_recommendations.len(),
        "Creating reactivation campaign"
    );

    let result = run_campaign(
        mailerlite,
        request.campaign_name.trim(),
        &request.selected_recommendations,
    )
    .await?;

    Ok(Json(result))
}

/// Execute the group -> subscribers -> campaign sequence.
///
/// Group and campaign creation failures abort the run; individual subscriber
/// failures only increment the skip count.
pub(crate) async fn run_campaign(
    client: &MailerLiteClient,
    campaign_name: &str,
    recommendations: &[Recommendation],
) -> Result<CampaignResult, MailerLiteError> {
    let group = client.create_group(campaign_name).await?;

    let mut added_count = 0;
    let mut skipped_count = 0;

    for recommendation in recommendations {
        let Some(email) = recommendation
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
        else {
            skipped_count += 1;
            continue;
        };

        let fields = subscriber_fields(recommendation);

        match client.upsert_subscriber(&group.id, email, fields).await {
            Ok(_) => added_count += 1,
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Subscriber upsert failed, skipping");
                skipped_count += 1;
            }
        }
    }

    let campaign = client
        .create_campaign(
            campaign_name,
            "We miss you - your exclusive offer inside",
            &group.id,
            CAMPAIGN_HTML,
        )
        .await?;

    tracing::info!(
        group_id = %group.id,
        campaign_id = %campaign.id,
        added = added_count,
        skipped = skipped_count,
        "Campaign created"
    );

    Ok(CampaignResult {
        success: true,
        added_count,
        skipped_count,
        group_id: group.id,
        campaign_id: campaign.id,
    })
}

/// Map a recommendation onto the subscriber's custom fields; the campaign
/// body references these for personalization.
fn subscriber_fields(recommendation: &Recommendation) -> SubscriberFields {
    SubscriberFields {
        name: recommendation.first_name.clone(),
        last_name: recommendation.last_name.clone(),
        discount_code: Some(recommendation.discount_code.clone()),
        discount_percent: Some(recommendation.discount_percent.to_string()),
        rationale: Some(recommendation.rationale.clone()),
    }
}

/// Campaign body; per-subscriber values come from the custom fields set
/// during upsert.
const CAMPAIGN_HTML: &str = r#"<html>
<body>
  <p>Hi {$name},</p>
  <p>It has been a while. Here is {$discount_percent}% off your next order:</p>
  <p style="font-size:24px;font-weight:bold">{$discount_code}</p>
  <p>The code is valid for 7 days and can be used once.</p>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_html_references_fields() {
        assert!(CAMPAIGN_HTML.contains("{$name}"));
        assert!(CAMPAIGN_HTML.contains("{$discount_code}"));
        assert!(CAMPAIGN_HTML.contains("{$discount_percent}"));
    }

    #[test]
    fn test_subscriber_fields_carry_name_and_code() {
        let recommendation = Recommendation {
            customer_id: 7,
            email: Some("back@example.com".to_string()),
            first_name: Some("Jordan".to_string()),
            last_name: Some("Reyes".to_string()),
            discount_percent: 20,
            discount_code: "WINBACK20".to_string(),
            rationale: "Lapsed 90 days".to_string(),
            messaging_angle: "We miss you".to_string(),
            expected_value: None,
        };

        let fields = subscriber_fields(&recommendation);
        let json = serde_json::to_value(&fields).expect("serialize");
        assert_eq!(json["name"], "Jordan");
        assert_eq!(json["last_name"], "Reyes");
        assert_eq!(json["discount_code"], "WINBACK20");
        assert_eq!(json["discount_percent"], "20");
    }

    #[test]
    fn test_campaign_result_serialization() {
        let result = CampaignResult {
            success: true,
            added_count: 12,
            skipped_count: 3,
            group_id: "g1".to_string(),
            campaign_id: "c1".to_string(),
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["addedCount"], 12);
        assert_eq!(json["skippedCount"], 3);
        assert_eq!(json["groupId"], "g1");
        assert_eq!(json["campaignId"], "c1");
    }
}
