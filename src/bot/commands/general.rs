//! General Discord commands - ping, help, and the informational pages.
//! These commands only read the site settings; none of them touch the store.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        config::settings::Settings,
        core::pricing::format_price,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let settings = &ctx.data().settings;
        let help_text = format!(
            "**{}**\n\
            {}\n\n\
            **Customer Commands**\n\
            • `/request <photo> <email> <instructions> [name] [rush_order] [high_res] [payment_proof]` - Submit a photo for editing.\n\
            • `/pricing` - Shows prices and add-ons.\n\
            • `/how_it_works` - Explains the process step by step.\n\
            • `/faq` - Frequently asked questions.\n\n\
            **Operator Commands**\n\
            • `/admin setup|login|logout` - Manage the operator session.\n\
            • `/admin dashboard` - Live overview of all requests.\n\
            • `/admin approve|reject|complete` - Triage a request.\n\
            • `/admin contact|details` - Reach out or inspect a request.\n\n\
            Questions? Contact {}.",
            settings.site_name, settings.tagline, settings.support_email
        );

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Answers the most common customer questions.
    #[poise::command(slash_command)]
    pub async fn faq(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let settings = &ctx.data().settings;
        let embed = serenity::CreateEmbed::default()
            .title("Frequently Asked Questions")
            .color(0x0058_65F2)
            .fields(
                settings
                    .faq
                    .iter()
                    .map(|item| (item.question.clone(), item.answer.clone(), false)),
            );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Walks through the request process from upload to delivery.
    #[poise::command(slash_command)]
    pub async fn how_it_works(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let settings = &ctx.data().settings;
        let mut text = String::from("**How It Works**\n");
        for step in &settings.steps {
            let _ = writeln!(text, "**{}. {}** - {}", step.number, step.title, step.description);
        }

        ctx.say(text).await?;
        Ok(())
    }

    /// Shows the base price and add-on surcharges.
    #[poise::command(slash_command)]
    pub async fn pricing(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(pricing_text(&ctx.data().settings)).await?;
        Ok(())
    }

    pub(crate) fn pricing_text(settings: &Settings) -> String {
        let pricing = &settings.pricing;
        format!(
            "**Pricing**\n\
            • Standard edit: **{}** ({} delivery)\n\
            • Rush order: **+{}** ({} delivery)\n\
            • High resolution: **+{}**",
            format_price(pricing.base_price),
            settings.delivery.standard,
            format_price(pricing.rush_order_price),
            settings.delivery.rush,
            format_price(pricing.high_res_price),
        )
    }

}

// Re-export all commands
pub use inner::*;
