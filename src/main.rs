#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use photo_edit_desk::{
    bot::runner,
    config::{database, settings},
    core::store::Store,
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load site settings (defaults apply when no file exists)
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Critical error loading settings: {}", e))?;
    info!("Loaded settings for {}", settings.site_name);
    if settings.active_relay_endpoint().is_none() {
        info!("No form relay configured; requests are stored locally only.");
    }

    // 4. Open the database and make sure the key-value table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is read directly before use, never stored in settings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    runner::run_bot(token, Store::new(db), Arc::new(settings)).await
}
