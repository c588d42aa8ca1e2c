//! Winback Core - Shared domain types and rule logic.
//!
//! This crate provides the pure domain layer used by the Winback server:
//! - [`customer`] - Raw Shopify customer records and the derived metrics shape
//! - [`rules`] - Tiered discount rules, the first-match-wins matcher, and
//!   recommendation construction
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no HTTP clients.
//! Everything here is deterministic and fully unit tested; the server crate
//! feeds it records fetched from Shopify and forwards its recommendations to
//! the discount and campaign APIs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod customer;
pub mod rules;

pub use customer::{CustomerMetrics, NO_RECENCY_SENTINEL, RawCustomerRecord};
pub use rules::{Recommendation, RuleConfig, RuleError, TierRule, filter_recommendations};
