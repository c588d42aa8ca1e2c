//! `Link`-header cursor extraction for Shopify REST pagination.
//!
//! Shopify returns continuation cursors in a `Link` response header:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/customers.json?limit=250&page_info=abc>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/customers.json?limit=250&page_info=def>; rel="next"
//! ```
//!
//! Only the `rel="next"` entry matters here; anything unparseable means
//! "no more pages" rather than an error.

use url::Url;

/// Shopify's page-size ceiling for list endpoints.
pub const MAX_PAGE_SIZE: usize = 250;

/// Extract the next-page `page_info` cursor from a `Link` header value.
///
/// Returns `None` when the header has no `rel="next"` entry or its URL or
/// `page_info` parameter cannot be parsed - both terminate pagination.
#[must_use]
pub fn next_page_info(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .find(|entry| entry.contains("rel=\"next\""))
        .and_then(|entry| {
            let url = entry.split(';').next()?.trim();
            let url = url.strip_prefix('<')?.strip_suffix('>')?;
            let parsed = Url::parse(url).ok()?;
            parsed
                .query_pairs()
                .find(|(key, _)| key == "page_info")
                .map(|(_, value)| value.into_owned())
        })
}
