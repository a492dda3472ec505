//! Discord command implementations organized by surface.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Operator dashboard commands
pub mod admin;

/// General utility and informational commands
pub mod general;

/// Customer intake command
pub mod request;

// Export commands
pub use admin::*;
pub use general::*;
pub use request::*;
