//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_pickle_binary`)
//! - Fake extension source trees (via `helpers`)

pub(crate) mod helpers;
