//! Integration tests for the winback server.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server
//! cargo run -p winback-server
//!
//! # Run integration tests against it
//! cargo test -p winback-integration-tests -- --ignored
//! ```
//!
//! Tests default to `http://localhost:3001`; override with
//! `WINBACK_BASE_URL`. Tests that exercise upstream APIs additionally need
//! the corresponding credentials configured on the server side.
