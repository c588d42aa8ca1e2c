//! Price rule and discount code creation.

use chrono::{Duration, SecondsFormat, Utc};
use tracing::instrument;

use winback_core::Recommendation;

use super::types::{
    DiscountCodeEnvelope, DiscountCodeInput, DiscountCodeRequest, PriceRuleEnvelope,
    PriceRuleInput, PriceRuleRequest,
};
use super::{AdminClient, ShopifyError};

/// Validity window for reactivation discounts. Fixed business rule together
/// with once-per-customer / single-use.
const VALIDITY_DAYS: i64 = 7;

impl AdminClient {
    /// Create a store-wide percentage discount for one recommendation:
    /// a price rule, then the customer-facing code under it.
    ///
    /// A created price rule whose code creation fails is left in place -
    /// there is no rollback, the operator cleans up in the Shopify admin.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] when either creation call fails.
    #[instrument(skip(self, recommendation), fields(code = %recommendation.discount_code))]
    pub async fn create_discount(
        &self,
        recommendation: &Recommendation,
    ) -> Result<String, ShopifyError> {
        let now = Utc::now();
        let request = PriceRuleRequest {
            price_rule: PriceRuleInput {
                title: recommendation.discount_code.clone(),
                target_type: "line_item",
                target_selection: "all",
                allocation_method: "across",
                value_type: "percentage",
                value: format!("-{}.0", recommendation.discount_percent),
                customer_selection: "all",
                once_per_customer: true,
                usage_limit: 1,
                starts_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
                ends_at: (now + Duration::days(VALIDITY_DAYS))
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        };

        let rule: PriceRuleEnvelope = self.post("/price_rules.json", &request).await?;

        let code_request = DiscountCodeRequest {
            discount_code: DiscountCodeInput {
                code: recommendation.discount_code.clone(),
            },
        };
        let created: DiscountCodeEnvelope = self
            .post(
                &format!("/price_rules/{}/discount_codes.json", rule.price_rule.id),
                &code_request,
            )
            .await?;

        tracing::debug!(
            price_rule_id = rule.price_rule.id,
            discount_code_id = created.discount_code.id,
            "Discount created"
        );
        Ok(created.discount_code.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rule_request_shape() {
        let request = PriceRuleRequest {
            price_rule: PriceRuleInput {
                title: "WINBACK20".to_string(),
                target_type: "line_item",
                target_selection: "all",
                allocation_method: "across",
                value_type: "percentage",
                value: "-20.0".to_string(),
                customer_selection: "all",
                once_per_customer: true,
                usage_limit: 1,
                starts_at: "2026-01-01T00:00:00Z".to_string(),
                ends_at: "2026-01-08T00:00:00Z".to_string(),
            },
        };

        let json = serde_json::to_value(&request).expect("serialize");
        let rule = &json["price_rule"];
        assert_eq!(rule["value"], "-20.0");
        assert_eq!(rule["value_type"], "percentage");
        assert_eq!(rule["once_per_customer"], true);
        assert_eq!(rule["usage_limit"], 1);
    }

    #[test]
    fn test_validity_window_is_seven_days() {
        assert_eq!(VALIDITY_DAYS, 7);
    }
}
