//! Submission record model.
//!
//! A [`SubmissionRecord`] is one customer photo-edit request. Records are
//! persisted as a JSON array, so the serde shape here is the storage format.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name stored when the customer leaves the name field empty
pub const NAME_NOT_PROVIDED: &str = "Not provided";

const ID_SUFFIX_LEN: usize = 9;

/// Lifecycle stage of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Waiting for operator review
    Pending,
    /// Approved with a payment link, edit underway
    InProgress,
    /// Edit delivered
    Completed,
}

impl Status {
    /// Storage label of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the customer supplied proof of payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No payment proof attached
    #[default]
    Unpaid,
    /// Payment proof attached at submission time
    Paid,
}

/// Metadata and (optionally) inline content of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported by the uploader
    pub mime_type: String,
    /// `data:` URL with the base64-encoded content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One customer photo-edit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// `req_<millis>_<suffix>`, unique within the collection
    pub id: String,
    /// Customer email address
    pub email: String,
    /// Customer display name, `"Not provided"` when left empty
    pub name: String,
    /// Free-text editing instructions
    pub instructions: String,
    /// Rush order add-on selected
    #[serde(default)]
    pub rush_order: bool,
    /// High-resolution add-on selected
    #[serde(default)]
    pub high_res: bool,
    /// Currency-formatted total, e.g. `"$3.00"`
    pub total_price: String,
    /// The photo to edit
    pub file: FileAttachment,
    /// Optional screenshot of the customer's payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_file: Option<FileAttachment>,
    /// Paid when a payment proof was attached
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Lifecycle stage
    pub status: Status,
    /// When the customer submitted the request
    pub submission_date: DateTime<Utc>,
    /// When an operator approved the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    /// When the edit was marked completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    /// Payment link attached on approval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_link: Option<String>,
}

impl SubmissionRecord {
    /// The short request number shown to customers: the timestamp segment of the id.
    #[must_use]
    pub fn request_number(&self) -> &str {
        self.id.split('_').nth(1).unwrap_or(&self.id)
    }

    /// Name used in greetings, `"Customer"` when none was given.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        if self.name.is_empty() || self.name == NAME_NOT_PROVIDED {
            "Customer"
        } else {
            &self.name
        }
    }

    /// Human-readable list of selected add-ons.
    #[must_use]
    pub fn options_label(&self) -> String {
        let mut options = Vec::new();
        if self.rush_order {
            options.push("Rush Order");
        }
        if self.high_res {
            options.push("High Resolution");
        }
        if options.is_empty() {
            "Standard".to_string()
        } else {
            options.join(", ")
        }
    }
}

/// Generates a fresh request id from the submission time and a random base-36 suffix.
#[must_use]
pub fn generate_request_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("req_{}_{suffix}", now.timestamp_millis())
}

/// Formats a byte count the way the dashboard shows file sizes (e.g. `"1.5 MB"`).
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    #[allow(clippy::cast_precision_loss)] // Display only
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_record;

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: Status = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, Status::Completed);
        assert_eq!(Status::Pending.to_string(), "pending");
    }

    #[test]
    fn test_generate_request_id_shape() {
        let now = Utc::now();
        let id = generate_request_id(now);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "req");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_ids_differ_within_same_millisecond() {
        let now = Utc::now();
        assert_ne!(generate_request_id(now), generate_request_id(now));
    }

    #[test]
    fn test_request_number_and_greeting() {
        let mut record = sample_record("req_1700000000000_abc123xyz");
        assert_eq!(record.request_number(), "1700000000000");

        record.name = NAME_NOT_PROVIDED.to_string();
        assert_eq!(record.greeting_name(), "Customer");
        record.name = "Ada".to_string();
        assert_eq!(record.greeting_name(), "Ada");
    }

    #[test]
    fn test_options_label() {
        let mut record = sample_record("req_1_a");
        assert_eq!(record.options_label(), "Standard");
        record.rush_order = true;
        record.high_res = true;
        assert_eq!(record.options_label(), "Rush Order, High Resolution");
    }

    #[test]
    fn test_optional_fields_absent_from_json() {
        let record = sample_record("req_1_a");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("stripe_link").is_none());
        assert!(json.get("payment_file").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_legacy_record_without_add_on_flags_parses() {
        let json = r#"{
            "id": "req_1_a",
            "email": "a@b.com",
            "name": "Not provided",
            "instructions": "Brighten the sky please",
            "total_price": "$1.00",
            "file": {"name": "a.jpg", "size": 10, "mime_type": "image/jpeg"},
            "status": "in-progress",
            "submission_date": "2026-10-18T10:00:00Z"
        }"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert!(!record.rush_order);
        assert_eq!(record.payment_status, PaymentStatus::Unpaid);
        assert_eq!(record.status, Status::InProgress);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
    }
}
