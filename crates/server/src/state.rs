//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::openai::OpenAiClient;
use crate::services::mailerlite::MailerLiteClient;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// Each upstream client is present only when its credentials were supplied;
/// handlers that need a missing client reject the request instead of the
/// server refusing to boot.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    shopify: Option<AdminClient>,
    mailerlite: Option<MailerLiteClient>,
    openai: Option<OpenAiClient>,
}

impl AppState {
    /// Build application state, constructing a client for each configured
    /// upstream.
    ///
    /// # Errors
    ///
    /// Returns error if a configured client fails to construct.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let shopify = config
            .shopify
            .as_ref()
            .map(AdminClient::new)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Shopify client init failed: {e}")))?;

        let mailerlite = config
            .mailerlite
            .as_ref()
            .map(MailerLiteClient::new)
            .transpose()
            .map_err(|e| AppError::Internal(format!("MailerLite client init failed: {e}")))?;

        let openai = config
            .openai
            .as_ref()
            .map(OpenAiClient::new)
            .transpose()
            .map_err(|e| AppError::Internal(format!("OpenAI client init failed: {e}")))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                mailerlite,
                openai,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn shopify(&self) -> Option<&AdminClient> {
        self.inner.shopify.as_ref()
    }

    #[must_use]
    pub fn mailerlite(&self) -> Option<&MailerLiteClient> {
        self.inner.mailerlite.as_ref()
    }

    #[must_use]
    pub fn openai(&self) -> Option<&OpenAiClient> {
        self.inner.openai.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("shopify", &self.inner.shopify.is_some())
            .field("mailerlite", &self.inner.mailerlite.is_some())
            .field("openai", &self.inner.openai.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_send_sync() {
        fn assert_bounds<T: Clone + Send + Sync>() {}
        assert_bounds::<AppState>();
    }
}
