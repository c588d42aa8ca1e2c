//! Customer records and the derived metrics shape.
//!
//! [`RawCustomerRecord`] mirrors the Shopify Admin REST customer resource
//! (only the fields the workflow reads; everything but the id is optional so
//! a sparse record never fails to deserialize). [`CustomerMetrics`] is the
//! fixed shape the rule matcher consumes, produced by
//! [`CustomerMetrics::from_raw`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel for `days_since_last_order` when a customer has no activity
/// timestamp at all.
///
/// This conflates "never ordered" with "very old data" and must be read as
/// "no recency signal", not as a real day count.
pub const NO_RECENCY_SENTINEL: i64 = 999;

const SECONDS_PER_DAY: i64 = 86_400;

/// A customer record as returned by the Shopify Admin REST API.
///
/// Sourced externally, never persisted. Amounts arrive as decimal strings
/// (e.g. `"150.00"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCustomerRecord {
    /// Shopify customer ID.
    pub id: u64,
    /// Customer email, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Lifetime order count.
    #[serde(default)]
    pub orders_count: Option<u32>,
    /// Lifetime spend as a decimal string.
    #[serde(default)]
    pub total_spent: Option<String>,
    /// Last activity timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Account creation timestamp (recency fallback).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Free-text comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
    /// Account state (`enabled`, `disabled`, `invited`, `declined`).
    #[serde(default)]
    pub state: Option<String>,
}

/// Aggregate metrics for one customer, the input shape of the tier matcher.
///
/// Serialized camelCase for the operator dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetrics {
    /// Shopify customer ID.
    pub id: u64,
    /// Customer email, if present.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Lifetime order count.
    pub total_orders: u32,
    /// Lifetime spend, non-negative.
    pub total_spent: Decimal,
    /// `total_spent / total_orders`, zero when there are no orders.
    pub average_order_value: Decimal,
    /// Whole days since the last activity timestamp, clamped at 0;
    /// [`NO_RECENCY_SENTINEL`] when no timestamp exists.
    pub days_since_last_order: i64,
}

impl CustomerMetrics {
    /// Reduce a raw Shopify record to the metrics shape.
    ///
    /// Total for any record: a missing order count becomes 0, a missing or
    /// unparseable (or negative) spend becomes 0, and a record without
    /// `updated_at` and `created_at` gets the [`NO_RECENCY_SENTINEL`].
    /// Future-dated timestamps clamp to 0 days rather than going negative.
    #[must_use]
    pub fn from_raw(raw: &RawCustomerRecord, now: DateTime<Utc>) -> Self {
        let total_orders = raw.orders_count.unwrap_or(0);

        let total_spent = raw
            .total_spent
            .as_deref()
            .and_then(|s| s.trim().parse::<Decimal>().ok())
            .filter(|d| !d.is_sign_negative())
            .unwrap_or(Decimal::ZERO);

        let average_order_value = if total_orders > 0 {
            total_spent / Decimal::from(total_orders)
        } else {
            Decimal::ZERO
        };

        let days_since_last_order = raw.updated_at.or(raw.created_at).map_or(
            NO_RECENCY_SENTINEL,
            |ts| {
                let elapsed = now.signed_duration_since(ts).num_seconds();
                (elapsed / SECONDS_PER_DAY).max(0)
            },
        );

        Self {
            id: raw.id,
            email: raw.email.clone(),
            first_name: raw.first_name.clone(),
            last_name: raw.last_name.clone(),
            total_orders,
            total_spent,
            average_order_value,
            days_since_last_order,
        }
    }
}
