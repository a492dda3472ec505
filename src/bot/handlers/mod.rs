//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete
//! that are not commands themselves.

/// Autocomplete handlers for request ids
pub mod autocomplete;
