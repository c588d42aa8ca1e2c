//! Bounded cursor-pagination fetch over the customers list endpoint.

use std::fmt::Write;

use tracing::instrument;

use winback_core::RawCustomerRecord;

use super::pagination::MAX_PAGE_SIZE;
use super::types::CustomersEnvelope;
use super::{AdminClient, ShopifyError};

/// Customer fields requested from Shopify; everything else is dead weight.
const CUSTOMER_FIELDS: &str =
    "id,email,first_name,last_name,orders_count,total_spent,updated_at,created_at,tags,state";

impl AdminClient {
    /// Fetch up to `limit_total` customers, following the `Link`-header
    /// cursor until the cap is reached or no further cursor is returned.
    ///
    /// `limit_total == 0` returns empty without issuing a request. A
    /// non-2xx response aborts the whole fetch with the response body as
    /// error detail - all or nothing per call, no retry.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] when any page request fails.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn fetch_customers(
        &self,
        limit_total: usize,
    ) -> Result<Vec<RawCustomerRecord>, ShopifyError> {
        let mut customers: Vec<RawCustomerRecord> = Vec::new();
        let mut page_info: Option<String> = None;

        while customers.len() < limit_total {
            let per_page = MAX_PAGE_SIZE.min(limit_total - customers.len());

            // Shopify allows only `limit` and `fields` alongside `page_info`.
            let mut path = format!("/customers.json?limit={per_page}&fields={CUSTOMER_FIELDS}");
            if let Some(cursor) = &page_info {
                let _ = write!(path, "&page_info={cursor}");
            }

            let (envelope, next_cursor): (CustomersEnvelope, Option<String>) =
                self.get_paged(&path).await?;

            tracing::debug!(
                page_size = envelope.customers.len(),
                accumulated = customers.len(),
                has_next = next_cursor.is_some(),
                "Fetched customer page"
            );

            customers.extend(envelope.customers);

            match next_cursor {
                Some(cursor) => page_info = Some(cursor),
                None => break,
            }
        }

        // Defensive trim in case the last page overshot the cap.
        customers.truncate(limit_total);
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopifyConfig;
    use secrecy::SecretString;

    fn test_client() -> AdminClient {
        AdminClient::new(&ShopifyConfig {
            store: "unreachable.invalid".to_string(),
            api_version: "2024-01".to_string(),
            access_token: SecretString::from("shpat_test_token"),
        })
        .expect("client should build")
    }

    #[tokio::test]
    async fn test_zero_limit_issues_no_request() {
        // The store domain does not resolve; a request would error, so an
        // Ok(empty) proves no request went out.
        let customers = test_client()
            .fetch_customers(0)
            .await
            .expect("zero-limit fetch must not touch the network");
        assert!(customers.is_empty());
    }
}
