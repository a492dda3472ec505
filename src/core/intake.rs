//! Intake form business logic.
//!
//! Validates a customer's request, prices it, encodes the uploads and appends
//! a `pending` [`SubmissionRecord`] to the persisted collection.

use crate::{
    config::settings::{Settings, UploadRules},
    core::{
        encoding::{ContentSource, PendingUpload, encode_uploads},
        pricing::{AddOns, calculate_total, format_price},
        relay::FormRelay,
        repository::SubmissionRepository,
        submission::{NAME_NOT_PROVIDED, PaymentStatus, Status, SubmissionRecord, generate_request_id},
        validation::{
            validate_email, validate_instructions, validate_payment_proof, validate_photo,
        },
    },
    errors::{Result, ValidationError},
};
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

/// Everything the customer entered on the intake form.
#[derive(Debug, Clone)]
pub struct IntakeForm<S> {
    /// Contact email
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    /// Editing instructions
    pub instructions: String,
    /// Selected add-ons
    pub add_ons: AddOns,
    /// The photo to edit; required
    pub photo: Option<PendingUpload<S>>,
    /// Optional payment screenshot
    pub payment_proof: Option<PendingUpload<S>>,
}

impl<S> IntakeForm<S> {
    /// Runs every field check in form order, stopping at the first failure.
    pub fn validate(&self, rules: &UploadRules) -> std::result::Result<(), ValidationError> {
        validate_photo(self.photo.as_ref().map(|p| &p.meta), rules)?;
        if let Some(proof) = &self.payment_proof {
            validate_payment_proof(&proof.meta, rules)?;
        }
        validate_email(&self.email)?;
        validate_instructions(&self.instructions, rules.min_instructions_len)?;
        Ok(())
    }

    /// Price the customer will be quoted for the selected add-ons.
    #[must_use]
    pub fn quoted_price(&self, settings: &Settings) -> String {
        format_price(calculate_total(&settings.pricing, self.add_ons))
    }
}

/// Validates the form, encodes its uploads and builds the pending record.
///
/// Nothing is persisted; see [`submit`] for the full pipeline.
pub async fn prepare_submission<S: ContentSource + Sync>(
    settings: &Settings,
    form: &IntakeForm<S>,
    now: DateTime<Utc>,
) -> Result<SubmissionRecord> {
    form.validate(&settings.uploads)?;
    let Some(photo) = &form.photo else {
        return Err(ValidationError::MissingPhoto.into());
    };

    let (file, payment_file) = encode_uploads(photo, form.payment_proof.as_ref()).await?;

    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NAME_NOT_PROVIDED)
        .to_string();
    let payment_status = if payment_file.is_some() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    };

    Ok(SubmissionRecord {
        id: generate_request_id(now),
        email: form.email.trim().to_string(),
        name,
        instructions: form.instructions.trim().to_string(),
        rush_order: form.add_ons.rush_order,
        high_res: form.add_ons.high_res,
        total_price: form.quoted_price(settings),
        file,
        payment_file,
        payment_status,
        status: Status::Pending,
        submission_date: now,
        approved_date: None,
        completed_date: None,
        stripe_link: None,
    })
}

/// How an accepted submission was recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    /// Appended to the local collection
    Stored(SubmissionRecord),
    /// Local persistence failed; forwarded to the form relay instead
    Relayed(SubmissionRecord),
}

impl IntakeOutcome {
    /// The submitted record, however it was recorded.
    #[must_use]
    pub const fn record(&self) -> &SubmissionRecord {
        match self {
            Self::Stored(record) | Self::Relayed(record) => record,
        }
    }
}

/// Full intake pipeline: validate, encode, build and append a pending record.
///
/// Validation failures are returned as `Error::Validation` and leave the
/// collection unchanged. If the append fails and a relay is given, the record
/// is forwarded there; the storage error is returned only when there is no
/// relay, and the relay error when forwarding fails too.
#[instrument(skip(repo, relay, settings, form), fields(email = %form.email))]
pub async fn submit<S: ContentSource + Sync>(
    repo: &SubmissionRepository,
    relay: Option<&FormRelay>,
    settings: &Settings,
    form: &IntakeForm<S>,
    now: DateTime<Utc>,
) -> Result<IntakeOutcome> {
    let record = prepare_submission(settings, form, now).await?;

    match repo.append(record.clone()).await {
        Ok(stored) => {
            info!(
                "New request {} for {} ({})",
                stored.id, stored.email, stored.total_price
            );
            Ok(IntakeOutcome::Stored(stored))
        }
        Err(store_err) => {
            error!("Failed to store request {}: {}", record.id, store_err);
            let Some(relay) = relay else {
                return Err(store_err);
            };
            warn!("Falling back to form relay at {}", relay.endpoint());
            relay.forward(&record).await?;
            Ok(IntakeOutcome::Relayed(record))
        }
    }
}
