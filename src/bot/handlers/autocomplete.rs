//! Autocomplete handlers for Discord slash command parameters.
//!
//! Operators pick requests by id; these handlers suggest ids of requests in
//! the status the command acts on, matching on id, email or name.

use crate::{
    bot::BotData,
    core::submission::{Status, SubmissionRecord},
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

fn matches_partial(record: &SubmissionRecord, partial_lower: &str) -> bool {
    record.id.to_lowercase().contains(partial_lower)
        || record.email.to_lowercase().contains(partial_lower)
        || record.name.to_lowercase().contains(partial_lower)
}

/// Filters records down to the ids worth suggesting.
#[must_use]
pub fn suggest_ids(records: &[SubmissionRecord], status: Option<Status>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    records
        .iter()
        .filter(|r| status.is_none_or(|s| r.status == s))
        .filter(|r| matches_partial(r, &partial_lower))
        .map(|r| r.id.clone())
        .take(MAX_SUGGESTIONS)
        .collect()
}

async fn suggest(
    ctx: poise::Context<'_, BotData, Error>,
    status: Option<Status>,
    partial: &str,
) -> Vec<String> {
    let Ok(records) = ctx.data().repository.load_all().await else {
        return Vec::new();
    };
    suggest_ids(&records, status, partial)
}

/// Suggests ids of pending requests.
pub async fn autocomplete_pending_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, Some(Status::Pending), partial).await
}

/// Suggests ids of in-progress requests.
pub async fn autocomplete_in_progress_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, Some(Status::InProgress), partial).await
}

/// Suggests ids of requests in any status.
pub async fn autocomplete_any_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, None, partial).await
}
