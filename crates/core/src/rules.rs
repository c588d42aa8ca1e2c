//! Tiered discount rules and the first-match-wins matcher.
//!
//! A [`RuleConfig`] is an explicitly ordered list of [`TierRule`]s plus an
//! optional default tier. Order matters and is preserved exactly as given:
//! tiers may overlap, and the first tier whose spend and recency bounds both
//! hold wins. The default tier, when present, applies without any bound
//! checks once every tier has been tried.
//!
//! Rule configs arrive as loosely-shaped JSON from the dashboard; every
//! field is an explicit named optional with a documented default, and
//! [`RuleConfig::validate`] rejects bad configs at the boundary instead of
//! coercing them deep inside the matcher.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::customer::CustomerMetrics;

/// Business ceiling on tier discounts.
pub const MAX_DISCOUNT_PERCENT: u32 = 40;

/// Prefix used to synthesize discount codes when a tier has no explicit one.
const DEFAULT_CODE_PREFIX: &str = "WINBACK";

const DEFAULT_RATIONALE: &str = "Lapsed customer matched a reactivation tier";
const DEFAULT_MESSAGING_ANGLE: &str = "We miss you - here is a discount to come back";

/// Rule config validation errors.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Config has neither tiers nor a default tier.
    #[error("rule config has no tiers and no default tier")]
    Empty,

    /// A tier's discount exceeds the business ceiling.
    #[error("{tier}: discountPercent {percent} exceeds the maximum of {MAX_DISCOUNT_PERCENT}")]
    PercentTooHigh {
        /// Which tier failed (e.g. "tier 2", "default tier").
        tier: String,
        /// The offending percentage.
        percent: u32,
    },

    /// `minTotalSpent` exceeds `maxTotalSpent`.
    #[error("{tier}: minTotalSpent exceeds maxTotalSpent")]
    InvertedSpendBounds {
        /// Which tier failed.
        tier: String,
    },

    /// `minDaysSinceLastOrder` exceeds `maxDaysSinceLastOrder`.
    #[error("{tier}: minDaysSinceLastOrder exceeds maxDaysSinceLastOrder")]
    InvertedDayBounds {
        /// Which tier failed.
        tier: String,
    },
}

/// One eligibility tier mapping customer metrics to a discount outcome.
///
/// All bounds are inclusive. Missing bounds default to `[0, +inf)` on both
/// axes; a missing `discount_percent` is treated as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TierRule {
    /// Inclusive lower spend bound (default 0).
    pub min_total_spent: Option<Decimal>,
    /// Inclusive upper spend bound (default unbounded).
    pub max_total_spent: Option<Decimal>,
    /// Inclusive lower recency bound in days (default 0).
    pub min_days_since_last_order: Option<i64>,
    /// Inclusive upper recency bound in days (default unbounded).
    pub max_days_since_last_order: Option<i64>,
    /// Discount percentage, 0-40 (default 0).
    pub discount_percent: Option<u32>,
    /// Explicit discount code; synthesized from the prefix when absent.
    pub discount_code: Option<String>,
    /// Prefix for synthesized codes (default "WINBACK").
    pub discount_code_prefix: Option<String>,
    /// Why this tier exists, forwarded into the recommendation.
    pub rationale: Option<String>,
    /// Suggested campaign messaging angle.
    pub messaging_angle: Option<String>,
    /// Expected recovered value per customer, passed through when numeric.
    pub expected_value: Option<Decimal>,
}

impl TierRule {
    /// Whether this tier's spend and recency bounds both hold for `metrics`.
    #[must_use]
    pub fn matches(&self, metrics: &CustomerMetrics) -> bool {
        let spend_ok = metrics.total_spent >= self.min_total_spent.unwrap_or(Decimal::ZERO)
            && self
                .max_total_spent
                .is_none_or(|max| metrics.total_spent <= max);

        let days_ok = metrics.days_since_last_order
            >= self.min_days_since_last_order.unwrap_or(0)
            && self
                .max_days_since_last_order
                .is_none_or(|max| metrics.days_since_last_order <= max);

        spend_ok && days_ok
    }

    /// Build the recommendation this tier produces for `metrics`.
    #[must_use]
    pub fn recommend(&self, metrics: &CustomerMetrics) -> Recommendation {
        let discount_percent = self.discount_percent.unwrap_or(0);
        let discount_code = self.discount_code.clone().unwrap_or_else(|| {
            let prefix = self
                .discount_code_prefix
                .as_deref()
                .unwrap_or(DEFAULT_CODE_PREFIX);
            format!("{prefix}{discount_percent}").to_uppercase()
        });

        Recommendation {
            customer_id: metrics.id,
            email: metrics.email.clone(),
            first_name: metrics.first_name.clone(),
            last_name: metrics.last_name.clone(),
            discount_percent,
            discount_code,
            rationale: self
                .rationale
                .clone()
                .unwrap_or_else(|| DEFAULT_RATIONALE.to_string()),
            messaging_angle: self
                .messaging_angle
                .clone()
                .unwrap_or_else(|| DEFAULT_MESSAGING_ANGLE.to_string()),
            expected_value: self.expected_value,
        }
    }

    fn validate(&self, label: &str) -> Result<(), RuleError> {
        if let Some(percent) = self.discount_percent
            && percent > MAX_DISCOUNT_PERCENT
        {
            return Err(RuleError::PercentTooHigh {
                tier: label.to_string(),
                percent,
            });
        }

        if let (Some(min), Some(max)) = (self.min_total_spent, self.max_total_spent)
            && min > max
        {
            return Err(RuleError::InvertedSpendBounds {
                tier: label.to_string(),
            });
        }

        if let (Some(min), Some(max)) = (
            self.min_days_since_last_order,
            self.max_days_since_last_order,
        ) && min > max
        {
            return Err(RuleError::InvertedDayBounds {
                tier: label.to_string(),
            });
        }

        Ok(())
    }
}

/// Ordered tier list with an optional catch-all default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    /// Tiers evaluated first-match-wins, in exactly this order.
    pub tiers: Vec<TierRule>,
    /// Applied without bound checks when no tier matches.
    #[serde(rename = "default")]
    pub default_tier: Option<Box<TierRule>>,
}

impl RuleConfig {
    /// Validate the config before use.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for an empty config, a discount above the
    /// business ceiling, or inverted bounds on any tier.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.tiers.is_empty() && self.default_tier.is_none() {
            return Err(RuleError::Empty);
        }

        for (idx, tier) in self.tiers.iter().enumerate() {
            tier.validate(&format!("tier {}", idx + 1))?;
        }
        if let Some(tier) = &self.default_tier {
            tier.validate("default tier")?;
        }

        Ok(())
    }

    /// Classify one customer into zero-or-one recommendation.
    ///
    /// Scans `tiers` in order and returns the first tier whose bounds hold;
    /// falls back to the default tier when present, else `None` (customer
    /// excluded from the campaign).
    #[must_use]
    pub fn match_customer(&self, metrics: &CustomerMetrics) -> Option<Recommendation> {
        self.tiers
            .iter()
            .find(|tier| tier.matches(metrics))
            .map(|tier| tier.recommend(metrics))
            .or_else(|| {
                self.default_tier
                    .as_ref()
                    .map(|tier| tier.recommend(metrics))
            })
    }
}

/// The final per-customer discount decision.
///
/// Created by the matcher, consumed immediately by the discount-code and
/// campaign creation calls; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Shopify customer ID.
    pub customer_id: u64,
    /// Customer email (recommendations without one are dropped downstream).
    pub email: Option<String>,
    /// First name, forwarded to campaign personalization.
    pub first_name: Option<String>,
    /// Last name, forwarded to campaign personalization.
    pub last_name: Option<String>,
    /// Discount percentage, 0-40.
    pub discount_percent: u32,
    /// Customer-facing discount code.
    pub discount_code: String,
    /// Why this customer got this tier.
    pub rationale: String,
    /// Suggested campaign messaging angle.
    pub messaging_angle: String,
    /// Expected recovered value, when the tier carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<Decimal>,
}

impl Recommendation {
    /// Whether this recommendation survives the batch filter: a positive
    /// discount and a non-empty email.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.discount_percent > 0 && self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Drop recommendations the campaign and discount APIs cannot act on.
///
/// Zero-percent or email-less recommendations are silently removed, even if
/// a tier matched. This filter is the caller's responsibility, not the
/// matcher's.
#[must_use]
pub fn filter_recommendations(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations
        .into_iter()
        .filter(Recommendation::is_actionable)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::customer::RawCustomerRecord;

    fn metrics(spent: i64, days: i64) -> CustomerMetrics {
        CustomerMetrics {
            id: 1,
            email: Some("lapsed@example.com".to_string()),
            first_name: Some("Lapsed".to_string()),
            last_name: Some("Customer".to_string()),
            total_orders: 2,
            total_spent: Decimal::from(spent),
            average_order_value: Decimal::from(spent / 2),
            days_since_last_order: days,
        }
    }

    fn tier(spend: (i64, i64), percent: u32) -> TierRule {
        TierRule {
            min_total_spent: Some(Decimal::from(spend.0)),
            max_total_spent: Some(Decimal::from(spend.1)),
            discount_percent: Some(percent),
            ..TierRule::default()
        }
    }

    #[test]
    fn test_first_matching_tier_wins_on_overlap() {
        let config = RuleConfig {
            tiers: vec![tier((0, 100), 10), tier((50, 150), 20)],
            default_tier: None,
        };

        let rec = config
            .match_customer(&metrics(75, 30))
            .expect("customer in both tiers must match");
        assert_eq!(rec.discount_percent, 10);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let config = RuleConfig {
            tiers: vec![TierRule {
                min_total_spent: Some(Decimal::from(100)),
                max_total_spent: Some(Decimal::from(200)),
                min_days_since_last_order: Some(30),
                max_days_since_last_order: Some(90),
                discount_percent: Some(15),
                ..TierRule::default()
            }],
            default_tier: None,
        };

        assert!(config.match_customer(&metrics(100, 30)).is_some());
        assert!(config.match_customer(&metrics(200, 90)).is_some());
        assert!(config.match_customer(&metrics(99, 60)).is_none());
        assert!(config.match_customer(&metrics(150, 91)).is_none());
    }

    #[test]
    fn test_no_tier_no_default_yields_none() {
        let config = RuleConfig {
            tiers: vec![tier((1000, 2000), 20)],
            default_tier: None,
        };
        assert!(config.match_customer(&metrics(10, 5)).is_none());
    }

    #[test]
    fn test_default_tier_applies_without_bound_checks() {
        let config = RuleConfig {
            tiers: vec![tier((1000, 2000), 20)],
            default_tier: Some(Box::new(TierRule {
                // Bounds on the default are ignored once it is reached.
                min_total_spent: Some(Decimal::from(500)),
                discount_percent: Some(5),
                ..TierRule::default()
            })),
        };

        let rec = config
            .match_customer(&metrics(10, 5))
            .expect("default tier must apply");
        assert_eq!(rec.discount_percent, 5);
    }

    #[test]
    fn test_code_synthesis_from_prefix() {
        let rule = TierRule {
            discount_percent: Some(15),
            discount_code_prefix: Some("SAVE".to_string()),
            ..TierRule::default()
        };
        let rec = rule.recommend(&metrics(75, 30));
        assert_eq!(rec.discount_code, "SAVE15");
    }

    #[test]
    fn test_code_synthesis_uppercases_prefix() {
        let rule = TierRule {
            discount_percent: Some(20),
            discount_code_prefix: Some("comeback".to_string()),
            ..TierRule::default()
        };
        assert_eq!(rule.recommend(&metrics(75, 30)).discount_code, "COMEBACK20");
    }

    #[test]
    fn test_explicit_code_beats_synthesis() {
        let rule = TierRule {
            discount_percent: Some(25),
            discount_code: Some("VIP25OFF".to_string()),
            discount_code_prefix: Some("SAVE".to_string()),
            ..TierRule::default()
        };
        assert_eq!(rule.recommend(&metrics(75, 30)).discount_code, "VIP25OFF");
    }

    #[test]
    fn test_default_prefix_is_winback() {
        let rule = TierRule {
            discount_percent: Some(20),
            ..TierRule::default()
        };
        assert_eq!(rule.recommend(&metrics(75, 30)).discount_code, "WINBACK20");
    }

    #[test]
    fn test_recommendation_carries_names_for_personalization() {
        let rec = tier((0, 100), 10).recommend(&metrics(75, 30));
        assert_eq!(rec.first_name.as_deref(), Some("Lapsed"));
        assert_eq!(rec.last_name.as_deref(), Some("Customer"));

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["firstName"], "Lapsed");
        assert_eq!(json["lastName"], "Customer");
    }

    #[test]
    fn test_unset_percent_is_zero() {
        let rec = TierRule::default().recommend(&metrics(75, 30));
        assert_eq!(rec.discount_percent, 0);
        assert_eq!(rec.discount_code, "WINBACK0");
        assert!(!rec.rationale.is_empty());
        assert!(!rec.messaging_angle.is_empty());
    }

    #[test]
    fn test_end_to_end_winback_scenario() {
        // Raw record 70 days stale with 3 orders at $150 total, against a
        // 60..=999 day tier at 20%.
        let raw = RawCustomerRecord {
            id: 7,
            email: Some("back@example.com".to_string()),
            first_name: None,
            last_name: None,
            orders_count: Some(3),
            total_spent: Some("150.00".to_string()),
            updated_at: Some(chrono::Utc::now() - chrono::Duration::days(70)),
            created_at: None,
            tags: None,
            state: None,
        };
        let m = CustomerMetrics::from_raw(&raw, chrono::Utc::now());
        assert_eq!(m.total_orders, 3);
        assert_eq!(m.average_order_value, Decimal::from(50));
        assert_eq!(m.days_since_last_order, 70);

        let config = RuleConfig {
            tiers: vec![TierRule {
                min_days_since_last_order: Some(60),
                max_days_since_last_order: Some(999),
                discount_percent: Some(20),
                ..TierRule::default()
            }],
            default_tier: None,
        };

        let rec = config.match_customer(&m).expect("tier must match");
        assert_eq!(rec.discount_percent, 20);
        assert_eq!(rec.discount_code, "WINBACK20");
    }

    #[test]
    fn test_filter_drops_zero_percent_and_missing_email() {
        let keep = TierRule {
            discount_percent: Some(10),
            ..TierRule::default()
        }
        .recommend(&metrics(75, 30));

        let zero_pct = TierRule::default().recommend(&metrics(75, 30));

        let mut no_email_metrics = metrics(75, 30);
        no_email_metrics.email = None;
        let no_email = TierRule {
            discount_percent: Some(10),
            ..TierRule::default()
        }
        .recommend(&no_email_metrics);

        let kept = filter_recommendations(vec![keep, zero_pct, no_email]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].discount_percent, 10);
    }

    #[test]
    fn test_validate_rejects_empty_config() {
        let err = RuleConfig::default().validate().unwrap_err();
        assert!(matches!(err, RuleError::Empty));
    }

    #[test]
    fn test_validate_rejects_percent_over_ceiling() {
        let config = RuleConfig {
            tiers: vec![tier((0, 100), 50)],
            default_tier: None,
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RuleError::PercentTooHigh { percent: 50, .. }));
        assert!(err.to_string().contains("tier 1"));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = RuleConfig {
            tiers: vec![tier((200, 100), 10)],
            default_tier: None,
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            RuleError::InvertedSpendBounds { .. }
        ));

        let config = RuleConfig {
            tiers: vec![TierRule {
                min_days_since_last_order: Some(90),
                max_days_since_last_order: Some(30),
                ..TierRule::default()
            }],
            default_tier: None,
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            RuleError::InvertedDayBounds { .. }
        ));
    }

    #[test]
    fn test_rule_config_deserializes_dashboard_json() {
        let config: RuleConfig = serde_json::from_str(
            r#"{
                "tiers": [
                    {"minTotalSpent": 100, "maxDaysSinceLastOrder": 180,
                     "discountPercent": 15, "discountCodePrefix": "SAVE"}
                ],
                "default": {"discountPercent": 5}
            }"#,
        )
        .expect("dashboard config should deserialize");

        assert_eq!(config.tiers.len(), 1);
        assert_eq!(config.tiers[0].discount_percent, Some(15));
        assert_eq!(
            config.default_tier.as_ref().and_then(|t| t.discount_percent),
            Some(5)
        );
        config.validate().expect("config should validate");
    }
}
