//! Shared fixtures for integration tests
//!
//! A capture server stands in for the wash backend so the reporter and hooks
//! can be exercised over real HTTP.

pub mod backend;

#[allow(unused_imports)]
pub use backend::MockBackend;
