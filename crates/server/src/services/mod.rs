//! External service clients that are not Shopify or `OpenAI`.

pub mod mailerlite;
