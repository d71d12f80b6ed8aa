//! Common test utilities for scoremap.
//!
//! Shared fixtures and assertions for the integration tests.

pub mod assertions;
pub mod image_utils;
pub mod test_data;
