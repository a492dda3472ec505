//! Operator commands - the `/admin` group.
//!
//! Account setup and login, the live dashboard and the triage actions that move
//! a request through pending → in-progress → completed. Everything except
//! setup and login requires the caller to be the logged-in operator.

use crate::config::settings::DashboardSettings;

/// Number of re-renders a live dashboard performs before it goes static.
#[must_use]
pub(crate) const fn refresh_count(dashboard: &DashboardSettings) -> u64 {
    if dashboard.refresh_interval_secs == 0 {
        return 0;
    }
    dashboard.live_minutes * 60 / dashboard.refresh_interval_secs
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::refresh_count;
    use crate::{
        bot::{Context, handlers::autocomplete, views},
        core::{auth, templates, triage},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::time::Duration;
    use tracing::warn;

    /// How long the reject buttons stay active
    const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

    /// Passes only for the operator currently logged in.
    async fn operator_check(ctx: Context<'_>) -> Result<bool> {
        auth::is_logged_in(ctx.data().store(), &ctx.author().id.to_string()).await
    }

    /// Shows a user-facing error as a reply and propagates everything else.
    async fn report(ctx: Context<'_>, error: Error) -> Result<()> {
        if error.is_user_facing() {
            ctx.say(format!("❌ {error}")).await?;
            Ok(())
        } else {
            Err(error)
        }
    }

    fn dashboard_reply(snapshot: &triage::DashboardSnapshot) -> poise::CreateReply {
        views::dashboard_embeds(snapshot)
            .into_iter()
            .fold(poise::CreateReply::default(), poise::CreateReply::embed)
    }

    /// Parent command for the operator dashboard.
    #[poise::command(
        slash_command,
        ephemeral,
        subcommands(
            "admin_setup",
            "admin_login",
            "admin_logout",
            "admin_dashboard",
            "admin_approve",
            "admin_reject",
            "admin_complete",
            "admin_contact",
            "admin_details"
        )
    )]
    pub async fn admin(ctx: Context<'_>) -> Result<()> {
        let help_text = "Operator commands. Available subcommands:\n\
            `/admin setup` - Create the operator account (first run only)\n\
            `/admin login` / `/admin logout` - Start or end your session\n\
            `/admin dashboard` - Live overview of all requests\n\
            `/admin approve` - Attach a payment link to a pending request\n\
            `/admin reject` - Remove a pending request\n\
            `/admin complete` - Mark an in-progress request as delivered\n\
            `/admin contact` - Get a mail link for a customer\n\
            `/admin details` - Show everything about one request";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates the operator account. Only allowed while none exists.
    #[poise::command(slash_command, ephemeral, rename = "setup")]
    pub async fn admin_setup(
        ctx: Context<'_>,
        #[description = "Operator username (min 3 characters)"] username: String,
        #[description = "Password (min 6 characters)"] password: String,
        #[description = "Repeat the password"] confirm_password: String,
    ) -> Result<()> {
        let operator_id = ctx.author().id.to_string();
        match auth::setup_admin(
            ctx.data().store(),
            &username,
            &password,
            &confirm_password,
            &operator_id,
            Utc::now(),
        )
        .await
        {
            Ok(credentials) => {
                ctx.say(format!(
                    "✅ Admin account **{}** created. You are now logged in.",
                    credentials.username
                ))
                .await?;
                Ok(())
            }
            Err(e) => report(ctx, e).await,
        }
    }

    /// Logs in as the operator.
    #[poise::command(slash_command, ephemeral, rename = "login")]
    pub async fn admin_login(
        ctx: Context<'_>,
        #[description = "Operator username"] username: String,
        #[description = "Password"] password: String,
    ) -> Result<()> {
        let store = ctx.data().store();
        if !auth::credentials_exist(store).await? {
            ctx.say("❌ No admin account exists yet. Create one with `/admin setup`.")
                .await?;
            return Ok(());
        }

        let operator_id = ctx.author().id.to_string();
        match auth::login(store, &username, &password, &operator_id).await {
            Ok(()) => {
                ctx.say("✅ Logged in. Open the dashboard with `/admin dashboard`.")
                    .await?;
                Ok(())
            }
            Err(e) => report(ctx, e).await,
        }
    }

    /// Ends the operator session.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "logout",
        check = "operator_check"
    )]
    pub async fn admin_logout(ctx: Context<'_>) -> Result<()> {
        match auth::logout(ctx.data().store(), &ctx.author().id.to_string()).await {
            Ok(()) => {
                ctx.say("👋 Logged out.").await?;
                Ok(())
            }
            Err(e) => report(ctx, e).await,
        }
    }

    /// Live overview: counters plus the pending, in-progress and completed lists.
    ///
    /// The message re-renders itself on the configured interval until the
    /// live period ends.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "dashboard",
        check = "operator_check"
    )]
    pub async fn admin_dashboard(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let snapshot = triage::load_dashboard(&data.repository, Utc::now()).await?;
        let handle = ctx.send(dashboard_reply(&snapshot)).await?;

        let dashboard = data.settings.dashboard;
        let refreshes = refresh_count(&dashboard);
        if refreshes == 0 {
            return Ok(());
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(dashboard.refresh_interval_secs));
        // First tick completes immediately
        ticker.tick().await;
        for _ in 0..refreshes {
            ticker.tick().await;
            let snapshot = match triage::load_dashboard(&data.repository, Utc::now()).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Dashboard refresh failed: {}", e);
                    continue;
                }
            };
            if let Err(e) = handle.edit(ctx, dashboard_reply(&snapshot)).await {
                warn!("Stopping dashboard refresh: {}", e);
                break;
            }
        }
        Ok(())
    }

    /// Approves a pending request and attaches its payment link.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "approve",
        check = "operator_check"
    )]
    pub async fn admin_approve(
        ctx: Context<'_>,
        #[description = "Request id"]
        #[autocomplete = "autocomplete::autocomplete_pending_id"]
        id: String,
        #[description = "Stripe payment link (https://...)"] payment_link: String,
    ) -> Result<()> {
        let data = ctx.data();
        match triage::approve(&data.repository, &data.settings, &id, &payment_link, Utc::now()).await
        {
            Ok(approval) => {
                let reply = poise::CreateReply::default()
                    .content(format!(
                        "✅ Request #{} approved. Send this email to **{}**:\n```\n{}\n```",
                        approval.record.request_number(),
                        approval.record.email,
                        approval.email_template
                    ))
                    .embed(views::request_embed(&approval.record));
                ctx.send(reply).await?;
                Ok(())
            }
            Err(e) => report(ctx, e).await,
        }
    }

    /// Rejects a pending request after confirmation. The request is removed.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "reject",
        check = "operator_check"
    )]
    pub async fn admin_reject(
        ctx: Context<'_>,
        #[description = "Request id"]
        #[autocomplete = "autocomplete::autocomplete_pending_id"]
        id: String,
    ) -> Result<()> {
        let Some(record) = ctx.data().repository.find(&id).await? else {
            return report(ctx, Error::SubmissionNotFound { id }).await;
        };

        let ctx_id = ctx.id();
        let confirm_id = format!("{ctx_id}-confirm");
        let cancel_id = format!("{ctx_id}-cancel");
        let buttons = serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Reject request")
                .style(serenity::ButtonStyle::Danger),
            serenity::CreateButton::new(&cancel_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Secondary),
        ]);
        let handle = ctx
            .send(
                poise::CreateReply::default()
                    .content(format!(
                        "⚠️ Reject request #{} from {}? This removes it permanently.",
                        record.request_number(),
                        record.email
                    ))
                    .components(vec![buttons]),
            )
            .await?;

        let prefix = ctx_id.to_string();
        let press = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .author_id(ctx.author().id)
            .filter(move |press| press.data.custom_id.starts_with(&prefix))
            .timeout(CONFIRM_TIMEOUT)
            .await;

        let outcome = match press {
            Some(press) => {
                press
                    .create_response(
                        ctx.serenity_context(),
                        serenity::CreateInteractionResponse::Acknowledge,
                    )
                    .await?;
                if press.data.custom_id == confirm_id {
                    match triage::reject(&ctx.data().repository, &id).await {
                        Ok(removed) => format!("🗑️ Request #{} rejected.", removed.request_number()),
                        Err(e) if e.is_user_facing() => format!("❌ {e}"),
                        Err(e) => return Err(e),
                    }
                } else {
                    "Rejection cancelled.".to_string()
                }
            }
            None => "Rejection timed out; nothing was changed.".to_string(),
        };

        handle
            .edit(
                ctx,
                poise::CreateReply::default()
                    .content(outcome)
                    .components(Vec::new()),
            )
            .await?;
        Ok(())
    }

    /// Marks an in-progress request as completed.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "complete",
        check = "operator_check"
    )]
    pub async fn admin_complete(
        ctx: Context<'_>,
        #[description = "Request id"]
        #[autocomplete = "autocomplete::autocomplete_in_progress_id"]
        id: String,
    ) -> Result<()> {
        let data = ctx.data();
        match triage::mark_completed(&data.repository, &id, Utc::now()).await {
            Ok(record) => {
                let notice = templates::completion_notice_email(&record, &data.settings);
                ctx.say(format!(
                    "✅ Request #{} marked as completed. Send this to **{}**:\n```\n{}\n```",
                    record.request_number(),
                    record.email,
                    notice
                ))
                .await?;
                Ok(())
            }
            Err(e) => report(ctx, e).await,
        }
    }

    /// Gives a mail link for writing to the customer about a request.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "contact",
        check = "operator_check"
    )]
    pub async fn admin_contact(
        ctx: Context<'_>,
        #[description = "Request id"]
        #[autocomplete = "autocomplete::autocomplete_any_id"]
        id: String,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(record) = data.repository.find(&id).await? else {
            return report(ctx, Error::SubmissionNotFound { id }).await;
        };

        let link = templates::contact_customer_link(&record, &data.settings);
        ctx.say(format!(
            "📧 Contact **{}** about request #{}:\n<{}>",
            record.email,
            record.request_number(),
            link
        ))
        .await?;
        Ok(())
    }

    /// Shows everything stored about one request.
    #[poise::command(
        slash_command,
        ephemeral,
        rename = "details",
        check = "operator_check"
    )]
    pub async fn admin_details(
        ctx: Context<'_>,
        #[description = "Request id"]
        #[autocomplete = "autocomplete::autocomplete_any_id"]
        id: String,
    ) -> Result<()> {
        let Some(record) = ctx.data().repository.find(&id).await? else {
            return report(ctx, Error::SubmissionNotFound { id }).await;
        };

        let reply = poise::CreateReply::default()
            .content(format!("```\n{}\n```", triage::details_summary(&record)))
            .embed(views::request_embed(&record));
        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_count_covers_live_period() {
        let dashboard = DashboardSettings {
            refresh_interval_secs: 30,
            live_minutes: 15,
        };
        assert_eq!(refresh_count(&dashboard), 30);
    }

    #[test]
    fn test_refresh_count_zero_interval_means_static() {
        let dashboard = DashboardSettings {
            refresh_interval_secs: 0,
            live_minutes: 15,
        };
        assert_eq!(refresh_count(&dashboard), 0);
    }
}
