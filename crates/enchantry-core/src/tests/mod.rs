//! Test module for resolution, query and concurrency tests.
//!
//! - **Integration tests**: snapshot caching, slot resolution and queries end to end
//! - **Concurrency tests**: many threads querying the same actors
//! - **Property tests**: resolution invariants over generated inventories
//!
//! # Test Structure
//!
//! - `integration.rs`: End-to-end tests through the public query surface
//! - `concurrency.rs`: Capture-once and parallel query tests
//! - `properties.rs`: proptest suites
//! - `helpers.rs`: Test host types and factory functions

mod helpers;
