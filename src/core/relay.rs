//! Third-party form relay fallback.
//!
//! When the local store cannot take a new submission and a relay endpoint is
//! configured, the request is POSTed there as multipart form data so the
//! customer's request is not lost.

use crate::{
    core::submission::SubmissionRecord,
    errors::{Error, Result},
};
use reqwest::multipart::Form;
use tracing::{info, instrument};

/// Client for a form-relay endpoint (e.g. a Formspree form).
#[derive(Debug, Clone)]
pub struct FormRelay {
    client: reqwest::Client,
    endpoint: String,
}

/// Text fields sent to the relay for one submission.
///
/// File contents stay local; only their metadata is forwarded.
#[must_use]
pub fn relay_fields(record: &SubmissionRecord) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("id", record.id.clone()),
        ("email", record.email.clone()),
        ("name", record.name.clone()),
        ("instructions", record.instructions.clone()),
        ("rush_order", record.rush_order.to_string()),
        ("high_res", record.high_res.to_string()),
        ("total_price", record.total_price.clone()),
        ("file_name", record.file.name.clone()),
        ("file_size", record.file.size.to_string()),
        ("file_type", record.file.mime_type.clone()),
        ("submission_date", record.submission_date.to_rfc3339()),
    ];
    if let Some(proof) = &record.payment_file {
        fields.push(("payment_file_name", proof.name.clone()));
        fields.push(("payment_file_size", proof.size.to_string()));
        fields.push(("payment_file_type", proof.mime_type.clone()));
    }
    fields
}

impl FormRelay {
    /// Creates a relay client for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the submission to the relay.
    #[instrument(skip(self, record), fields(id = %record.id, endpoint = %self.endpoint))]
    pub async fn forward(&self, record: &SubmissionRecord) -> Result<()> {
        let form = relay_fields(record)
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Relay {
                message: format!("relay responded with HTTP {status}"),
            });
        }

        info!("Forwarded request {} to form relay", record.id);
        Ok(())
    }
}
