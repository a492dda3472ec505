//! Customer intake command - `/request`.
//!
//! Collects the photo, optional payment proof, contact details, instructions
//! and add-ons, then hands them to the core intake pipeline.

use crate::{core::encoding::ContentSource, errors::Result};
use poise::serenity_prelude as serenity;

impl ContentSource for serenity::Attachment {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.download().await?)
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, views},
        core::{
            encoding::{PendingUpload, guess_mime_type},
            intake::{self, IntakeForm, IntakeOutcome},
            pricing::AddOns,
            validation::FileMeta,
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use tracing::{error, info};

    fn pending_upload(attachment: serenity::Attachment) -> PendingUpload<serenity::Attachment> {
        let mime_type = attachment
            .content_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(&attachment.filename).to_string());
        PendingUpload {
            meta: FileMeta::new(
                attachment.filename.clone(),
                u64::from(attachment.size),
                &mime_type,
            ),
            source: attachment,
        }
    }

    /// Submit a photo for editing.
    ///
    /// The request is reviewed by an operator, who then sends a payment link
    /// to the email address you provide.
    #[allow(clippy::too_many_arguments)] // One parameter per form field
    #[poise::command(slash_command, ephemeral)]
    pub async fn request(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The photo to edit (JPG, PNG, GIF or WebP, up to 10MB)"]
        photo: serenity::Attachment,
        #[description = "Email address for the payment link and delivery"] email: String,
        #[description = "What should we do? Be as specific as possible (min 10 characters)"]
        instructions: String,
        #[description = "Your name"] name: Option<String>,
        #[description = "Rush order: faster delivery for a surcharge"] rush_order: Option<bool>,
        #[description = "High-resolution output for a surcharge"] high_res: Option<bool>,
        #[description = "Screenshot of your payment (JPG, PNG or WebP, up to 5MB)"]
        payment_proof: Option<serenity::Attachment>,
    ) -> Result<()> {
        let data = ctx.data();
        let settings = &data.settings;

        let form = IntakeForm {
            email,
            name,
            instructions,
            add_ons: AddOns {
                rush_order: rush_order.unwrap_or(false),
                high_res: high_res.unwrap_or(false),
            },
            photo: Some(pending_upload(photo)),
            payment_proof: payment_proof.map(pending_upload),
        };

        // Reject bad input before spending time on downloads
        if let Err(problem) = form.validate(&settings.uploads) {
            ctx.say(format!("❌ {problem}")).await?;
            return Ok(());
        }

        ctx.defer_ephemeral().await?;

        match intake::submit(
            &data.repository,
            data.relay.as_ref(),
            settings,
            &form,
            Utc::now(),
        )
        .await
        {
            Ok(IntakeOutcome::Stored(record)) => {
                info!("Request {} submitted by {}", record.id, ctx.author().id);
                let reply = poise::CreateReply::default()
                    .content(format!(
                        "✅ **Request submitted!** Your request number is **#{}** and the total is **{}**.\n\
                        We'll review it and email a secure payment link to {}.",
                        record.request_number(),
                        record.total_price,
                        record.email
                    ))
                    .embed(views::request_embed(&record));
                ctx.send(reply).await?;
            }
            Ok(IntakeOutcome::Relayed(record)) => {
                ctx.say(format!(
                    "✅ **Request received!** Your request #{} was forwarded to our team. \
                    We'll email {} once it has been reviewed.",
                    record.request_number(),
                    record.email
                ))
                .await?;
            }
            Err(Error::Validation(problem)) => {
                ctx.say(format!("❌ {problem}")).await?;
            }
            Err(e) => {
                error!("Failed to submit request: {}", e);
                ctx.say(
                    "❌ There was an error submitting your request. Please try again.",
                )
                .await?;
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
