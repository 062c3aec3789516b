//! Integration test crate for shopform.
//!
//! This crate has no library code. Its tests start the real routers on
//! loopback sockets and drive them over HTTP, the way a browser would.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p shopform-integration-tests
//! ```
