//! Core business logic - framework-agnostic intake, triage and storage operations.

/// Operator credentials and login state
pub mod auth;
/// Upload content encoding into inline data URLs
pub mod encoding;
/// Intake form pipeline
pub mod intake;
/// Price calculation and currency formatting
pub mod pricing;
/// Form relay fallback
pub mod relay;
/// Submission collection repository
pub mod repository;
/// Key-value store access
pub mod store;
/// Submission record model
pub mod submission;
/// Email templates and mail links
pub mod templates;
/// Admin dashboard aggregation and operator actions
pub mod triage;
/// Intake form field validation
pub mod validation;
