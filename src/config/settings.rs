//! Site settings loading from config.toml
//!
//! Holds everything the intake form and the admin dashboard treat as static:
//! site copy, per-option prices, upload limits, delivery times, FAQ and
//! "how it works" content, dashboard refresh timing and the two email
//! templates. Every field has a built-in default, so a missing file or a
//! partially filled one still yields a usable [`Settings`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const MIB: u64 = 1024 * 1024;

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name used in replies and email signatures
    pub site_name: String,
    /// Short marketing line shown by `/help`
    pub tagline: String,
    /// Address customers are told to contact
    pub support_email: String,
    /// Optional third-party form relay used when local persistence fails
    pub relay_endpoint: Option<String>,
    /// Per-option prices
    pub pricing: Pricing,
    /// Upload limits for the photo and the payment proof
    pub uploads: UploadRules,
    /// Promised turnaround times
    pub delivery: Delivery,
    /// Live dashboard timing
    pub dashboard: DashboardSettings,
    /// Frequently asked questions
    pub faq: Vec<FaqItem>,
    /// "How it works" steps
    pub steps: Vec<Step>,
    /// Templates with `{placeholder}` tokens
    pub email_templates: EmailTemplates,
}

/// Fixed per-option prices in dollars
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Price of a standard edit
    pub base_price: f64,
    /// Surcharge for a rush order
    pub rush_order_price: f64,
    /// Surcharge for high-resolution output
    pub high_res_price: f64,
}

/// Permitted MIME types and size ceilings for uploads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadRules {
    /// MIME types accepted for the photo
    pub allowed_file_types: Vec<String>,
    /// Maximum photo size in bytes
    pub max_file_size: u64,
    /// MIME types accepted for the payment proof
    pub payment_allowed_file_types: Vec<String>,
    /// Maximum payment-proof size in bytes
    pub payment_max_file_size: u64,
    /// Minimum trimmed length of the instructions
    pub min_instructions_len: usize,
}

/// Delivery time strings substituted into `{deliveryTime}`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Delivery {
    /// Turnaround for standard orders
    pub standard: String,
    /// Turnaround for rush orders
    pub rush: String,
}

/// Timing of the self-refreshing dashboard message
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Seconds between re-renders
    pub refresh_interval_secs: u64,
    /// How long a dashboard message keeps refreshing
    pub live_minutes: u64,
}

/// A single FAQ entry
#[derive(Debug, Clone, Deserialize)]
pub struct FaqItem {
    /// Question text
    pub question: String,
    /// Answer text
    pub answer: String,
}

/// A single "how it works" step
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Position in the sequence
    pub number: u32,
    /// Short title
    pub title: String,
    /// One-line description
    pub description: String,
}

/// Email templates with placeholder tokens
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailTemplates {
    /// Sent when an operator approves a request and attaches a payment link
    pub payment_request: String,
    /// Sent when an edit is marked completed
    pub completion_notice: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_name: "PhotoEdit Pro".to_string(),
            tagline: "Get Your Photos Edited – $1 per image".to_string(),
            support_email: "support@photoeditpro.com".to_string(),
            relay_endpoint: None,
            pricing: Pricing::default(),
            uploads: UploadRules::default(),
            delivery: Delivery::default(),
            dashboard: DashboardSettings::default(),
            faq: default_faq(),
            steps: default_steps(),
            email_templates: EmailTemplates::default(),
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            base_price: 1.00,
            rush_order_price: 2.00,
            high_res_price: 1.00,
        }
    }
}

impl Default for UploadRules {
    fn default() -> Self {
        Self {
            allowed_file_types: ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_file_size: 10 * MIB,
            payment_allowed_file_types: ["image/jpeg", "image/jpg", "image/png", "image/webp"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            payment_max_file_size: 5 * MIB,
            min_instructions_len: 10,
        }
    }
}

impl Default for Delivery {
    fn default() -> Self {
        Self {
            standard: "24-48 hours".to_string(),
            rush: "12 hours".to_string(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            live_minutes: 15,
        }
    }
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self {
            payment_request: "Subject: Your Photo Edit Request - Payment Link

Dear {customerName},

Thank you for submitting your photo editing request! We've reviewed your submission and are ready to proceed.

Request Details:
- Request ID: #{requestId}
- Instructions: {instructions}
- Total Amount: {totalPrice}

To proceed with your photo edit, please complete payment using the secure link below:
{stripeLink}

Once payment is confirmed, we'll begin editing your photo and deliver the final result within {deliveryTime}.

If you have any questions, please don't hesitate to contact us.

Best regards,
PhotoEdit Pro Team
{supportEmail}"
                .to_string(),
            completion_notice: "Subject: Your Photo Edit is Complete!

Dear {customerName},

Great news! Your photo edit is complete and ready for download.

Request ID: #{requestId}
Completed: {completionDate}

Please find your edited photo attached to this email.

We hope you love the result! If you need any revisions, please let us know within 24 hours.

Thank you for choosing PhotoEdit Pro!

Best regards,
PhotoEdit Pro Team
{supportEmail}"
                .to_string(),
        }
    }
}

fn default_faq() -> Vec<FaqItem> {
    [
        (
            "What's the turnaround time?",
            "Most edits are completed within 24-48 hours after payment confirmation.",
        ),
        (
            "What file formats do you accept?",
            "We accept JPG, PNG, and most common image formats up to 10MB.",
        ),
        (
            "What types of edits do you do?",
            "Color correction, background removal, retouching, filters, and basic photo enhancements.",
        ),
        (
            "Do you offer refunds?",
            "If you're not satisfied with the edit, we'll revise it once for free or provide a full refund.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| FaqItem {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

fn default_steps() -> Vec<Step> {
    [
        ("Upload Your Photo", "Submit your image along with detailed editing instructions"),
        ("Add Instructions", "Tell us exactly what edits you want - be as specific as possible"),
        ("Wait for Approval", "We'll review your request and ensure it meets our guidelines"),
        ("Pay via Stripe", "Receive a secure payment link via email - only $1 per image"),
        ("Get Your Edit", "Receive your professionally edited photo within 24-48 hours"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, description), number)| Step {
        number,
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}

impl Settings {
    /// Returns the relay endpoint if one is configured and not the placeholder.
    #[must_use]
    pub fn active_relay_endpoint(&self) -> Option<&str> {
        self.relay_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty() && !endpoint.contains("YOUR_FORM_ID"))
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or a value has the wrong type.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let pricing = &settings.pricing;
    if !pricing.base_price.is_finite() || pricing.base_price <= 0.0 {
        return Err(Error::Config {
            message: "pricing.base_price must be positive".to_string(),
        });
    }
    for (name, surcharge) in [
        ("rush_order_price", pricing.rush_order_price),
        ("high_res_price", pricing.high_res_price),
    ] {
        if !surcharge.is_finite() || surcharge < 0.0 {
            return Err(Error::Config {
                message: format!("pricing.{name} must not be negative"),
            });
        }
    }
    if settings.dashboard.refresh_interval_secs == 0 {
        return Err(Error::Config {
            message: "dashboard.refresh_interval_secs must be at least 1".to_string(),
        });
    }

    Ok(settings)
}

/// Loads settings from a TOML file, falling back to defaults if the file is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            "Settings file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    let settings = parse_settings(&contents)?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Loads settings from `PHOTO_EDIT_CONFIG`, or ./config.toml when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path =
        std::env::var("PHOTO_EDIT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_defaults_match_published_prices() {
        let settings = Settings::default();
        assert_eq!(settings.pricing.base_price, 1.0);
        assert_eq!(settings.pricing.rush_order_price, 2.0);
        assert_eq!(settings.pricing.high_res_price, 1.0);
        assert_eq!(settings.uploads.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.uploads.payment_max_file_size, 5 * 1024 * 1024);
        assert_eq!(settings.steps.len(), 5);
        assert_eq!(settings.steps[4].number, 5);
    }

    #[test]
    fn test_parse_partial_settings() {
        let toml_str = r#"
            site_name = "Pixel Fixers"

            [pricing]
            rush_order_price = 5.0

            [[faq]]
            question = "Do you edit videos?"
            answer = "No, photos only."
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.site_name, "Pixel Fixers");
        assert_eq!(settings.pricing.rush_order_price, 5.0);
        assert_eq!(settings.pricing.base_price, 1.0);
        assert_eq!(settings.faq.len(), 1);
        assert_eq!(settings.delivery.rush, "12 hours");
        assert!(settings.email_templates.payment_request.contains("{stripeLink}"));
    }

    #[test]
    fn test_rejects_non_positive_base_price() {
        let result = parse_settings("[pricing]\nbase_price = 0.0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_negative_surcharges() {
        let rush = parse_settings("[pricing]\nbase_price = 1.0\nrush_order_price = -3.0\n");
        assert!(matches!(rush, Err(Error::Config { message }) if message.contains("rush_order_price")));

        let high_res = parse_settings("[pricing]\nhigh_res_price = -0.5\n");
        assert!(matches!(high_res, Err(Error::Config { message }) if message.contains("high_res_price")));

        let free_add_on = parse_settings("[pricing]\nhigh_res_price = 0.0\n");
        assert!(free_add_on.is_ok());
    }

    #[test]
    fn test_rejects_non_finite_prices() {
        let result = parse_settings("[pricing]\nbase_price = inf\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_settings("[pricing]\nrush_order_price = nan\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_relay_placeholder_is_inactive() {
        let mut settings = Settings::default();
        assert!(settings.active_relay_endpoint().is_none());

        settings.relay_endpoint = Some("https://formspree.io/f/YOUR_FORM_ID".to_string());
        assert!(settings.active_relay_endpoint().is_none());

        settings.relay_endpoint = Some("https://formspree.io/f/abc123".to_string());
        assert_eq!(
            settings.active_relay_endpoint(),
            Some("https://formspree.io/f/abc123")
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = load_settings("definitely/not/here/config.toml").unwrap();
        assert_eq!(settings.site_name, "PhotoEdit Pro");
    }

    #[test]
    fn test_shipped_config_parses() {
        let settings = parse_settings(include_str!("../../config.toml")).unwrap();
        assert_eq!(settings.pricing.rush_order_price, 2.0);
        assert_eq!(settings.faq.len(), 4);
        assert_eq!(settings.steps.len(), 5);
        assert!(settings.active_relay_endpoint().is_none());
    }
}
