//! Embed builders for request cards and the live dashboard.
//!
//! Pure formatting over core types; no database access happens here.

use crate::core::{
    submission::{Status, SubmissionRecord, format_file_size},
    triage::DashboardSnapshot,
};
use poise::serenity_prelude as serenity;

/// Discord embeds allow at most 25 fields
const MAX_FIELDS: usize = 25;
/// Discord caps the combined text of all embeds in one message
const MESSAGE_EMBED_TEXT_LIMIT: usize = 6000;
/// Kept free in each bucket for its title and overflow footer
const BUCKET_OVERHEAD: usize = 80;
/// Keep card values comfortably under the 1024-character field limit
const MAX_INSTRUCTIONS_PREVIEW: usize = 300;

const COLOR_PENDING: u32 = 0x00F5_9E0B;
const COLOR_IN_PROGRESS: u32 = 0x0058_65F2;
const COLOR_COMPLETED: u32 = 0x0005_9669;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

/// Name and value of one request card.
#[must_use]
pub fn request_card(record: &SubmissionRecord) -> (String, String) {
    let title = format!(
        "Request #{} · {}",
        record.request_number(),
        record.submission_date.format("%Y-%m-%d")
    );

    let mut lines = vec![
        format!("**ID:** `{}`", record.id),
        format!("**Email:** {}", record.email),
        format!("**Name:** {}", record.name),
        format!(
            "**Instructions:** {}",
            truncate(&record.instructions, MAX_INSTRUCTIONS_PREVIEW)
        ),
        format!("**Options:** {}", record.options_label()),
        format!("**Total:** {}", record.total_price),
        format!(
            "**File:** {} ({})",
            record.file.name,
            format_file_size(record.file.size)
        ),
    ];
    if let Some(link) = &record.stripe_link {
        lines.push(format!("**Payment link:** {link}"));
    }

    (title, lines.join("\n"))
}

fn text_len(name: &str, value: &str) -> usize {
    name.chars().count() + value.chars().count()
}

/// Embed for one status list. Cards are added while they fit in `budget`
/// characters; the rest are counted in the footer.
fn bucket_embed(
    title: &str,
    color: u32,
    records: &[SubmissionRecord],
    empty: &str,
    budget: usize,
) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::default()
        .title(format!("{title} ({})", records.len()))
        .color(color);

    if records.is_empty() {
        return embed.description(empty);
    }

    let mut used = 0;
    let mut cards = Vec::new();
    for record in records.iter().take(MAX_FIELDS) {
        let (name, value) = request_card(record);
        let len = text_len(&name, &value);
        if used + len > budget {
            break;
        }
        used += len;
        cards.push((name, value, false));
    }

    let hidden = records.len() - cards.len();
    let mut embed = embed.fields(cards);
    if hidden > 0 {
        embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
            "…and {hidden} more (use /admin details)"
        )));
    }
    embed
}

/// Builds the dashboard: one summary embed plus one embed per status list.
///
/// The combined text stays within Discord's per-message embed limit; each
/// list gets an equal share of what the summary leaves.
#[must_use]
pub fn dashboard_embeds(snapshot: &DashboardSnapshot) -> Vec<serenity::CreateEmbed> {
    let stats = &snapshot.stats;
    let summary_title = "📋 Admin Dashboard";
    let summary_fields = [
        ("Pending", stats.pending_count.to_string()),
        ("Completed today", stats.completed_today_count.to_string()),
        ("Revenue today", stats.today_revenue_label()),
        ("Total revenue", stats.total_revenue_label()),
        ("Rating", stats.rating.to_string()),
    ];
    let summary_len = summary_title.chars().count()
        + summary_fields
            .iter()
            .map(|(name, value)| text_len(name, value))
            .sum::<usize>();

    let bucket_budget =
        (MESSAGE_EMBED_TEXT_LIMIT.saturating_sub(summary_len) / 3).saturating_sub(BUCKET_OVERHEAD);

    let summary = serenity::CreateEmbed::default()
        .title(summary_title)
        .color(COLOR_IN_PROGRESS)
        .fields(
            summary_fields
                .into_iter()
                .map(|(name, value)| (name, value, true)),
        )
        .timestamp(serenity::Timestamp::now());

    vec![
        summary,
        bucket_embed(
            "⏳ Pending",
            COLOR_PENDING,
            &snapshot.buckets.pending,
            "No pending requests.",
            bucket_budget,
        ),
        bucket_embed(
            "🛠️ In progress",
            COLOR_IN_PROGRESS,
            &snapshot.buckets.in_progress,
            "No requests in progress.",
            bucket_budget,
        ),
        bucket_embed(
            "✅ Completed",
            COLOR_COMPLETED,
            &snapshot.buckets.completed,
            "No completed requests yet.",
            bucket_budget,
        ),
    ]
}

/// A single request card as its own embed, colored by status.
#[must_use]
pub fn request_embed(record: &SubmissionRecord) -> serenity::CreateEmbed {
    let color = match record.status {
        Status::Pending => COLOR_PENDING,
        Status::InProgress => COLOR_IN_PROGRESS,
        Status::Completed => COLOR_COMPLETED,
    };
    let (title, description) = request_card(record);
    serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .color(color)
        .footer(serenity::CreateEmbedFooter::new(format!("Status: {}", record.status)))
}
