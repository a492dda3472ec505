//! Unified error types for `PhotoEdit Desk`.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation problems
//! carry their own [`ValidationError`] so the bot layer can show the exact
//! message next to the offending field instead of a generic failure.

use thiserror::Error;

/// A user-correctable problem with intake or operator input.
///
/// The `Display` text of each variant is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No image was attached to the request
    #[error("Please upload a photo")]
    MissingPhoto,

    /// The image MIME type is not in the allowed list
    #[error("Please upload a valid image file (JPG, PNG, GIF, WebP)")]
    UnsupportedPhotoType {
        /// MIME type reported for the upload
        mime_type: String,
    },

    /// The image exceeds the configured size ceiling
    #[error("File size must be less than {limit_mb}MB")]
    PhotoTooLarge {
        /// Size of the upload in bytes
        size: u64,
        /// Ceiling expressed in whole megabytes
        limit_mb: u64,
    },

    /// The payment proof MIME type is not in the allowed list
    #[error("Please upload a valid image file (JPG, PNG, WebP)")]
    UnsupportedPaymentProofType {
        /// MIME type reported for the upload
        mime_type: String,
    },

    /// The payment proof exceeds its (smaller) size ceiling
    #[error("Payment confirmation file must be less than {limit_mb}MB")]
    PaymentProofTooLarge {
        /// Size of the upload in bytes
        size: u64,
        /// Ceiling expressed in whole megabytes
        limit_mb: u64,
    },

    /// The email address is not syntactically valid
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// The instructions are shorter than the minimum length
    #[error("Please provide more detailed instructions (at least {min} characters)")]
    InstructionsTooShort {
        /// Minimum number of characters
        min: usize,
    },
}

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The persisted collection could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No submission with the given id exists
    #[error("Request '{id}' not found")]
    SubmissionNotFound {
        /// Requested submission id
        id: String,
    },

    /// A submission with this id is already stored
    #[error("Request '{id}' already exists")]
    DuplicateSubmission {
        /// Conflicting submission id
        id: String,
    },

    /// The requested status change is not allowed from the current status
    #[error("Cannot {action} request '{id}' while it is {from}")]
    InvalidTransition {
        /// Submission id
        id: String,
        /// Current status label
        from: String,
        /// Attempted action (e.g. "approve")
        action: &'static str,
    },

    /// Payment link is missing or not an `https://` URL
    #[error("Please enter a valid Stripe payment link (got '{link}')")]
    InvalidPaymentLink {
        /// The rejected link
        link: String,
    },

    /// Operator credential setup or verification failed
    #[error("{message}")]
    Credentials {
        /// Message safe to show to the operator
        message: String,
    },

    /// The form relay rejected or failed the upload
    #[error("Form relay error: {message}")]
    Relay {
        /// Human-readable description
        message: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Relay {
            message: value.to_string(),
        }
    }
}

impl Error {
    /// Whether the message can be shown to the person who caused it.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::SubmissionNotFound { .. }
                | Self::InvalidTransition { .. }
                | Self::InvalidPaymentLink { .. }
                | Self::Credentials { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::PhotoTooLarge {
                size: 11 * 1024 * 1024,
                limit_mb: 10
            }
            .to_string(),
            "File size must be less than 10MB"
        );
        assert_eq!(
            ValidationError::InstructionsTooShort { min: 10 }.to_string(),
            "Please provide more detailed instructions (at least 10 characters)"
        );
    }

    #[test]
    fn test_validation_error_passes_through_display() {
        let err: Error = ValidationError::InvalidEmail.into();
        assert_eq!(err.to_string(), "Please enter a valid email address");
    }

    #[test]
    fn test_user_facing_errors() {
        assert!(Error::from(ValidationError::MissingPhoto).is_user_facing());
        assert!(
            Error::SubmissionNotFound {
                id: "req_1_a".to_string()
            }
            .is_user_facing()
        );
        assert!(
            !Error::Relay {
                message: "timeout".to_string()
            }
            .is_user_facing()
        );
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_facing());
    }
}
