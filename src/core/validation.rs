//! Intake form validation.
//!
//! All checks return a [`ValidationError`] whose text is shown next to the
//! offending field. Nothing here touches the store.

use crate::{config::settings::UploadRules, errors::ValidationError};
use regex::Regex;
use std::sync::LazyLock;

const MIB: u64 = 1024 * 1024;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex is valid"));

/// Metadata of an upload, known before its content is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// File name as uploaded
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type, lowercase without parameters
    pub mime_type: String,
}

impl FileMeta {
    /// Builds metadata, normalizing the MIME type (`"Image/JPEG; q=1"` → `"image/jpeg"`).
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, mime_type: &str) -> Self {
        let mime_type = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self {
            name: name.into(),
            size,
            mime_type,
        }
    }
}

fn allows(allowed: &[String], mime_type: &str) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(mime_type))
}

/// Checks that a photo is present, of a permitted type and under the size ceiling.
pub fn validate_photo(photo: Option<&FileMeta>, rules: &UploadRules) -> Result<(), ValidationError> {
    let photo = photo.ok_or(ValidationError::MissingPhoto)?;

    if !allows(&rules.allowed_file_types, &photo.mime_type) {
        return Err(ValidationError::UnsupportedPhotoType {
            mime_type: photo.mime_type.clone(),
        });
    }
    if photo.size > rules.max_file_size {
        return Err(ValidationError::PhotoTooLarge {
            size: photo.size,
            limit_mb: rules.max_file_size / MIB,
        });
    }
    Ok(())
}

/// Checks a payment-proof image against its own type list and smaller ceiling.
pub fn validate_payment_proof(
    proof: &FileMeta,
    rules: &UploadRules,
) -> Result<(), ValidationError> {
    if !allows(&rules.payment_allowed_file_types, &proof.mime_type) {
        return Err(ValidationError::UnsupportedPaymentProofType {
            mime_type: proof.mime_type.clone(),
        });
    }
    if proof.size > rules.payment_max_file_size {
        return Err(ValidationError::PaymentProofTooLarge {
            size: proof.size,
            limit_mb: rules.payment_max_file_size / MIB,
        });
    }
    Ok(())
}

/// Checks email syntax: something, `@`, something, `.`, something, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Requires at least `min` characters of instructions after trimming.
pub fn validate_instructions(instructions: &str, min: usize) -> Result<(), ValidationError> {
    if instructions.trim().chars().count() < min {
        return Err(ValidationError::InstructionsTooShort { min });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(size: u64) -> FileMeta {
        FileMeta::new("photo.jpg", size, "image/jpeg")
    }

    #[test]
    fn test_mime_type_is_normalized() {
        let meta = FileMeta::new("a.png", 1, " Image/PNG; charset=binary");
        assert_eq!(meta.mime_type, "image/png");
    }

    #[test]
    fn test_photo_required() {
        let rules = UploadRules::default();
        assert_eq!(
            validate_photo(None, &rules),
            Err(ValidationError::MissingPhoto)
        );
    }

    #[test]
    fn test_photo_type_and_size() {
        let rules = UploadRules::default();
        assert!(validate_photo(Some(&jpeg(10 * MIB)), &rules).is_ok());
        assert!(matches!(
            validate_photo(Some(&jpeg(10 * MIB + 1)), &rules),
            Err(ValidationError::PhotoTooLarge { limit_mb: 10, .. })
        ));
        assert!(matches!(
            validate_photo(Some(&FileMeta::new("a.pdf", 10, "application/pdf")), &rules),
            Err(ValidationError::UnsupportedPhotoType { .. })
        ));
        assert!(validate_photo(Some(&FileMeta::new("a.gif", 10, "image/gif")), &rules).is_ok());
    }

    #[test]
    fn test_payment_proof_has_smaller_ceiling_and_no_gif() {
        let rules = UploadRules::default();
        assert!(validate_payment_proof(&jpeg(5 * MIB), &rules).is_ok());
        assert!(matches!(
            validate_payment_proof(&jpeg(6 * MIB), &rules),
            Err(ValidationError::PaymentProofTooLarge { limit_mb: 5, .. })
        ));
        assert!(matches!(
            validate_payment_proof(&FileMeta::new("a.gif", 10, "image/gif"), &rules),
            Err(ValidationError::UnsupportedPaymentProofType { .. })
        ));
    }

    #[test]
    fn test_email_syntax() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  first.last@sub.example.org ").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_instructions_length() {
        assert!(validate_instructions("Make it pop", 10).is_ok());
        assert!(validate_instructions("   too short   ", 10).is_err());
        assert_eq!(
            validate_instructions("short", 10),
            Err(ValidationError::InstructionsTooShort { min: 10 })
        );
    }
}
