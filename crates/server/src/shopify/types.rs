//! Wire envelopes for the Shopify Admin REST API.
//!
//! The REST API wraps every resource in a single-key object
//! (`{"customers": [...]}`, `{"price_rule": {...}}`); these types mirror
//! that shape.

use serde::{Deserialize, Serialize};

use winback_core::RawCustomerRecord;

/// Response envelope for `GET /customers.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomersEnvelope {
    /// The page of customer records.
    pub customers: Vec<RawCustomerRecord>,
}

/// Request envelope for `POST /price_rules.json`.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRuleRequest {
    pub price_rule: PriceRuleInput,
}

/// A percentage price rule scoped store-wide.
///
/// The 7-day / once-per-customer / single-use policy is a fixed business
/// rule, not configurable per call.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRuleInput {
    /// Internal title (same text as the discount code).
    pub title: String,
    /// Always "line_item" - store-wide line-item scope.
    pub target_type: &'static str,
    /// Always "all".
    pub target_selection: &'static str,
    /// Always "across".
    pub allocation_method: &'static str,
    /// Always "percentage".
    pub value_type: &'static str,
    /// Negative percentage string, e.g. "-20.0".
    pub value: String,
    /// Always "all".
    pub customer_selection: &'static str,
    pub once_per_customer: bool,
    pub usage_limit: u32,
    /// ISO 8601 activation time (now).
    pub starts_at: String,
    /// ISO 8601 expiry time (now + 7 days).
    pub ends_at: String,
}

/// Response envelope for `POST /price_rules.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRuleEnvelope {
    pub price_rule: PriceRule,
}

/// The created price rule (only the fields the workflow reads).
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRule {
    pub id: u64,
}

/// Request envelope for `POST /price_rules/{id}/discount_codes.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountCodeRequest {
    pub discount_code: DiscountCodeInput,
}

/// The customer-facing code attached to a price rule.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountCodeInput {
    pub code: String,
}

/// Response envelope for discount code creation.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeEnvelope {
    pub discount_code: DiscountCode,
}

/// A created discount code.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCode {
    pub id: u64,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customers_envelope_deserializes() {
        let json = r#"{"customers": [
            {"id": 1, "email": "a@example.com", "orders_count": 2, "total_spent": "50.00"},
            {"id": 2}
        ]}"#;
        let envelope: CustomersEnvelope =
            serde_json::from_str(json).expect("envelope should deserialize");
        assert_eq!(envelope.customers.len(), 2);
        assert_eq!(envelope.customers[0].orders_count, Some(2));
    }

    #[test]
    fn test_price_rule_envelope_deserializes() {
        let json = r#"{"price_rule": {"id": 99, "title": "WINBACK20", "value": "-20.0"}}"#;
        let envelope: PriceRuleEnvelope =
            serde_json::from_str(json).expect("envelope should deserialize");
        assert_eq!(envelope.price_rule.id, 99);
    }
}
