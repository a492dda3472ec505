//! Shared test utilities for `PhotoEdit Desk`.
//!
//! This module provides common helper functions for setting up test stores
//! and building submissions and intake forms with sensible defaults.

use crate::{
    core::{
        encoding::PendingUpload,
        intake::IntakeForm,
        pricing::AddOns,
        repository::SubmissionRepository,
        store::Store,
        submission::{FileAttachment, NAME_NOT_PROVIDED, PaymentStatus, Status, SubmissionRecord},
        validation::FileMeta,
    },
    errors::Result,
};
use chrono::{TimeZone, Utc};
use tracing_subscriber::EnvFilter;

/// Initializes tracing for tests; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_store() -> Result<Store> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(Store::new(db))
}

/// Creates a submission repository over a fresh in-memory store.
pub async fn setup_test_repository() -> Result<SubmissionRepository> {
    Ok(SubmissionRepository::new(setup_test_store().await?))
}

/// Builds a pending submission with sensible defaults.
///
/// # Defaults
/// * `email`: `"a@b.com"`
/// * `name`: `"Not provided"`
/// * `total_price`: `"$1.00"`, no add-ons
/// * `submission_date`: 2026-10-18 10:00 UTC
#[allow(clippy::unwrap_used)] // Fixed, valid timestamp
#[must_use]
pub fn sample_record(id: &str) -> SubmissionRecord {
    SubmissionRecord {
        id: id.to_string(),
        email: "a@b.com".to_string(),
        name: NAME_NOT_PROVIDED.to_string(),
        instructions: "Brighten the sky and remove the lamp post".to_string(),
        rush_order: false,
        high_res: false,
        total_price: "$1.00".to_string(),
        file: FileAttachment {
            name: "photo.jpg".to_string(),
            size: 2048,
            mime_type: "image/jpeg".to_string(),
            data: None,
        },
        payment_file: None,
        payment_status: PaymentStatus::Unpaid,
        status: Status::Pending,
        submission_date: Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap(),
        approved_date: None,
        completed_date: None,
        stripe_link: None,
    }
}

/// A JPEG upload claiming `size` bytes, backed by a few bytes of content.
#[must_use]
pub fn jpeg_upload(size: u64) -> PendingUpload<Vec<u8>> {
    PendingUpload {
        meta: FileMeta::new("photo.jpg", size, "image/jpeg"),
        source: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// An intake form that passes validation: `a@b.com`, 12 characters of
/// instructions, a small JPEG and no add-ons.
#[must_use]
pub fn valid_form() -> IntakeForm<Vec<u8>> {
    IntakeForm {
        email: "a@b.com".to_string(),
        name: None,
        instructions: "Brighten sky".to_string(),
        add_ons: AddOns::default(),
        photo: Some(jpeg_upload(4)),
        payment_proof: None,
    }
}
