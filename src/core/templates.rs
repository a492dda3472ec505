//! Email template rendering and `mailto:` link composition.
//!
//! Templates carry `{placeholder}` tokens that are filled from a submission at
//! send time. Nothing is actually sent: the operator copies the text or opens
//! the mail link.

use crate::{config::settings::Settings, core::submission::SubmissionRecord};
use url::form_urlencoded;

/// Values substituted into a template. Tokens without a value are left as-is.
#[derive(Debug, Default, Clone)]
pub struct TemplateValues<'a> {
    /// `{customerName}`
    pub customer_name: &'a str,
    /// `{requestId}`
    pub request_id: &'a str,
    /// `{instructions}`
    pub instructions: &'a str,
    /// `{totalPrice}`
    pub total_price: &'a str,
    /// `{stripeLink}`
    pub stripe_link: Option<&'a str>,
    /// `{deliveryTime}`
    pub delivery_time: &'a str,
    /// `{supportEmail}`
    pub support_email: &'a str,
    /// `{completionDate}`
    pub completion_date: Option<String>,
}

impl<'a> TemplateValues<'a> {
    /// Collects the values for `record` using the site settings.
    #[must_use]
    pub fn for_record(record: &'a SubmissionRecord, settings: &'a Settings) -> Self {
        let delivery_time = if record.rush_order {
            settings.delivery.rush.as_str()
        } else {
            settings.delivery.standard.as_str()
        };

        Self {
            customer_name: record.greeting_name(),
            request_id: record.request_number(),
            instructions: &record.instructions,
            total_price: &record.total_price,
            stripe_link: record.stripe_link.as_deref(),
            delivery_time,
            support_email: &settings.support_email,
            completion_date: record
                .completed_date
                .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string()),
        }
    }
}

/// Replaces every known `{token}` in `template`.
#[must_use]
pub fn render(template: &str, values: &TemplateValues<'_>) -> String {
    let mut rendered = template
        .replace("{customerName}", values.customer_name)
        .replace("{requestId}", values.request_id)
        .replace("{instructions}", values.instructions)
        .replace("{totalPrice}", values.total_price)
        .replace("{deliveryTime}", values.delivery_time)
        .replace("{supportEmail}", values.support_email);

    if let Some(link) = values.stripe_link {
        rendered = rendered.replace("{stripeLink}", link);
    }
    if let Some(date) = &values.completion_date {
        rendered = rendered.replace("{completionDate}", date);
    }
    rendered
}

/// Renders the payment-request email for an approved submission.
#[must_use]
pub fn payment_request_email(record: &SubmissionRecord, settings: &Settings) -> String {
    render(
        &settings.email_templates.payment_request,
        &TemplateValues::for_record(record, settings),
    )
}

/// Renders the completion notice for a completed submission.
#[must_use]
pub fn completion_notice_email(record: &SubmissionRecord, settings: &Settings) -> String {
    render(
        &settings.email_templates.completion_notice,
        &TemplateValues::for_record(record, settings),
    )
}

fn encode_component(value: &str) -> String {
    // form encoding writes spaces as '+', and a literal '+' is already escaped as %2B
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Builds a `mailto:` link with an encoded subject and body.
#[must_use]
pub fn mailto_link(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{to}?subject={}&body={}",
        encode_component(subject),
        encode_component(body)
    )
}

/// Mail link the operator uses to contact a customer about an in-progress request.
#[must_use]
pub fn contact_customer_link(record: &SubmissionRecord, settings: &Settings) -> String {
    let subject = format!("Photo Edit Request #{} - Update", record.request_number());
    let body = format!(
        "Dear {},\n\nRegarding your photo editing request...\n\nBest regards,\n{} Team",
        record.greeting_name(),
        settings.site_name
    );
    mailto_link(&record.email, &subject, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_record;

    #[test]
    fn test_render_substitutes_all_tokens() {
        let mut record = sample_record("req_1700000000000_abc");
        record.name = "Ada".to_string();
        record.rush_order = true;
        record.stripe_link = Some("https://pay.example/xyz".to_string());
        let settings = Settings::default();

        let email = payment_request_email(&record, &settings);
        assert!(email.contains("Dear Ada,"));
        assert!(email.contains("Request ID: #1700000000000"));
        assert!(email.contains("https://pay.example/xyz"));
        assert!(email.contains("within 12 hours"));
        assert!(email.contains("support@photoeditpro.com"));
        assert!(!email.contains('{'));
    }

    #[test]
    fn test_standard_delivery_time() {
        let record = sample_record("req_1_a");
        let settings = Settings::default();
        let values = TemplateValues::for_record(&record, &settings);
        assert_eq!(values.delivery_time, "24-48 hours");
        assert_eq!(values.customer_name, "Customer");
    }

    #[test]
    fn test_unknown_values_left_in_place() {
        let rendered = render("Link: {stripeLink}", &TemplateValues::default());
        assert_eq!(rendered, "Link: {stripeLink}");
    }

    #[test]
    fn test_completion_notice_uses_completion_date() {
        let mut record = sample_record("req_1_a");
        record.completed_date = Some(record.submission_date);
        let email = completion_notice_email(&record, &Settings::default());
        assert!(email.contains("Completed: 2026-10-18 10:00 UTC"));
    }

    #[test]
    fn test_mailto_link_encoding() {
        let link = mailto_link("a@b.com", "Hi there & more", "Line 1\nA+B");
        assert_eq!(
            link,
            "mailto:a@b.com?subject=Hi%20there%20%26%20more&body=Line%201%0AA%2BB"
        );
    }

    #[test]
    fn test_contact_customer_link() {
        let record = sample_record("req_1700000000000_abc");
        let link = contact_customer_link(&record, &Settings::default());
        assert!(link.starts_with("mailto:a@b.com?subject=Photo%20Edit%20Request%20%231700000000000"));
    }
}
