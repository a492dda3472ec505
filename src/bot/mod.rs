//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `PhotoEdit Desk`: the
//! customer intake command, the operator dashboard commands, autocomplete
//! handlers and the framework setup that ties them together.

/// Discord command implementations (request, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Framework construction, error handling and client startup
pub mod runner;
/// Embed builders for request cards and the dashboard
pub mod views;

use crate::{
    config::settings::Settings,
    core::{relay::FormRelay, repository::SubmissionRepository, store::Store},
};
use std::sync::Arc;

/// Shared data available to all bot commands.
/// Holds the injected store handles, the site settings and the optional relay.
pub struct BotData {
    /// Submission collection, used by both the intake and admin commands
    pub repository: SubmissionRepository,
    /// Site settings loaded at startup
    pub settings: Arc<Settings>,
    /// Form relay used when local persistence fails
    pub relay: Option<FormRelay>,
}

impl BotData {
    /// Creates a new `BotData` from the store and settings, building the relay
    /// client only when an endpoint is configured.
    #[must_use]
    pub fn new(store: Store, settings: Arc<Settings>) -> Self {
        let relay = settings.active_relay_endpoint().map(FormRelay::new);
        Self {
            repository: SubmissionRepository::new(store),
            settings,
            relay,
        }
    }

    /// The underlying key-value store (login flag, credentials).
    #[must_use]
    pub const fn store(&self) -> &Store {
        self.repository.store()
    }
}

/// Poise context alias used by every command
pub type Context<'a> = poise::Context<'a, BotData, crate::errors::Error>;

pub use commands::*;
pub use handlers::*;
