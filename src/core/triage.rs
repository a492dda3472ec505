//! Admin dashboard business logic.
//!
//! Partitions the collection by status, aggregates the dashboard counters and
//! implements the operator actions: approve (attach payment link), reject
//! (remove a pending request) and mark completed. All functions are
//! framework-agnostic; the bot layer only formats what they return.

use crate::{
    config::settings::Settings,
    core::{
        pricing::{format_price, parse_price},
        repository::SubmissionRepository,
        submission::{Status, SubmissionRecord, format_file_size},
        templates,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::Write;
use tracing::{info, instrument, warn};
use url::Url;

/// Rating shown on the dashboard; there is no review system behind it.
pub const STATIC_RATING: &str = "5.0";

/// Submissions split by lifecycle stage, each in collection order.
#[derive(Debug, Clone, Default)]
pub struct StatusBuckets {
    /// Waiting for review
    pub pending: Vec<SubmissionRecord>,
    /// Approved and being edited
    pub in_progress: Vec<SubmissionRecord>,
    /// Delivered
    pub completed: Vec<SubmissionRecord>,
}

/// Aggregate counters shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Number of pending requests
    pub pending_count: usize,
    /// Number of requests completed on `today`
    pub completed_today_count: usize,
    /// Sum of `total_price` over requests completed on `today`
    pub completed_today_revenue: f64,
    /// Sum of `total_price` over all completed requests
    pub total_revenue: f64,
    /// Static rating placeholder
    pub rating: &'static str,
}

impl DashboardStats {
    /// Today's revenue formatted with a currency prefix.
    #[must_use]
    pub fn today_revenue_label(&self) -> String {
        format_price(self.completed_today_revenue)
    }

    /// Cumulative revenue formatted with a currency prefix.
    #[must_use]
    pub fn total_revenue_label(&self) -> String {
        format_price(self.total_revenue)
    }
}

/// Everything a dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Counters
    pub stats: DashboardStats,
    /// Per-status lists
    pub buckets: StatusBuckets,
}

/// Result of approving a request.
#[derive(Debug, Clone)]
pub struct Approval {
    /// The record after the transition
    pub record: SubmissionRecord,
    /// Rendered payment-request email for the operator to copy
    pub email_template: String,
}

/// Splits records into the three status lists.
#[must_use]
pub fn partition(records: &[SubmissionRecord]) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    for record in records {
        let bucket = match record.status {
            Status::Pending => &mut buckets.pending,
            Status::InProgress => &mut buckets.in_progress,
            Status::Completed => &mut buckets.completed,
        };
        bucket.push(record.clone());
    }
    buckets
}

fn record_price(record: &SubmissionRecord) -> f64 {
    parse_price(&record.total_price).unwrap_or_else(|| {
        warn!(
            "Request {} has unparseable price '{}', counting as 0",
            record.id, record.total_price
        );
        0.0
    })
}

/// Computes the dashboard counters. "Today" is the UTC calendar day `today`.
#[must_use]
pub fn compute_stats(records: &[SubmissionRecord], today: NaiveDate) -> DashboardStats {
    let completed: Vec<&SubmissionRecord> = records
        .iter()
        .filter(|r| r.status == Status::Completed)
        .collect();
    let completed_today: Vec<&SubmissionRecord> = completed
        .iter()
        .copied()
        .filter(|r| r.completed_date.is_some_and(|d| d.date_naive() == today))
        .collect();

    DashboardStats {
        pending_count: records.iter().filter(|r| r.status == Status::Pending).count(),
        completed_today_count: completed_today.len(),
        completed_today_revenue: completed_today.iter().map(|r| record_price(r)).sum(),
        total_revenue: completed.iter().map(|r| record_price(r)).sum(),
        rating: STATIC_RATING,
    }
}

/// Reads the collection and builds a fresh dashboard snapshot.
#[instrument(skip(repo))]
pub async fn load_dashboard(
    repo: &SubmissionRepository,
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let records = repo.load_all().await?;
    Ok(DashboardSnapshot {
        stats: compute_stats(&records, now.date_naive()),
        buckets: partition(&records),
    })
}

/// Checks that a payment link is an absolute `https://` URL.
pub fn validate_payment_link(link: &str) -> Result<Url> {
    let link = link.trim();
    let invalid = || Error::InvalidPaymentLink {
        link: link.to_string(),
    };

    if !link.starts_with("https://") {
        return Err(invalid());
    }
    let url = Url::parse(link).map_err(|_| invalid())?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(url)
}

fn require_status(record: &SubmissionRecord, expected: Status, action: &'static str) -> Result<()> {
    if record.status == expected {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            id: record.id.clone(),
            from: record.status.to_string(),
            action,
        })
    }
}

/// Approves a pending request: attaches the payment link, moves it to
/// in-progress and renders the payment-request email.
///
/// A link that is not `https://` is refused and the record is left unchanged.
#[instrument(skip(repo, settings))]
pub async fn approve(
    repo: &SubmissionRepository,
    settings: &Settings,
    id: &str,
    payment_link: &str,
    now: DateTime<Utc>,
) -> Result<Approval> {
    validate_payment_link(payment_link)?;
    let link = payment_link.trim().to_string();

    let record = repo
        .update(id, move |record| {
            require_status(record, Status::Pending, "approve")?;
            record.status = Status::InProgress;
            record.stripe_link = Some(link);
            record.approved_date = Some(now);
            Ok(())
        })
        .await?;

    info!("Approved request {}", record.id);
    let email_template = templates::payment_request_email(&record, settings);
    Ok(Approval {
        record,
        email_template,
    })
}

/// Rejects a pending request by removing it from the collection.
#[instrument(skip(repo))]
pub async fn reject(repo: &SubmissionRepository, id: &str) -> Result<SubmissionRecord> {
    let removed = repo
        .remove_if(id, |record| require_status(record, Status::Pending, "reject"))
        .await?;
    info!("Rejected request {}", removed.id);
    Ok(removed)
}

/// Marks an in-progress request completed and stamps the completion time.
#[instrument(skip(repo))]
pub async fn mark_completed(
    repo: &SubmissionRepository,
    id: &str,
    now: DateTime<Utc>,
) -> Result<SubmissionRecord> {
    let record = repo
        .update(id, move |record| {
            require_status(record, Status::InProgress, "complete")?;
            record.status = Status::Completed;
            record.completed_date = Some(now);
            Ok(())
        })
        .await?;
    info!("Completed request {}", record.id);
    Ok(record)
}

/// Read-only text summary of a request.
#[must_use]
pub fn details_summary(record: &SubmissionRecord) -> String {
    let mut summary = String::new();
    let _ = writeln!(summary, "ID: {}", record.id);
    let _ = writeln!(summary, "Email: {}", record.email);
    let _ = writeln!(summary, "Name: {}", record.name);
    let _ = writeln!(summary, "Instructions: {}", record.instructions);
    let _ = writeln!(summary, "Options: {}", record.options_label());
    let _ = writeln!(summary, "Total: {}", record.total_price);
    let _ = writeln!(
        summary,
        "File: {} ({})",
        record.file.name,
        format_file_size(record.file.size)
    );
    let _ = writeln!(
        summary,
        "Submitted: {}",
        record.submission_date.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(approved) = record.approved_date {
        let _ = writeln!(summary, "Approved: {}", approved.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(completed) = record.completed_date {
        let _ = writeln!(summary, "Completed: {}", completed.format("%Y-%m-%d %H:%M UTC"));
    }
    let _ = write!(summary, "Status: {}", record.status);
    summary
}
