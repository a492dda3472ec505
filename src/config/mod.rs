/// Database configuration and connection management
pub mod database;

/// Site settings loading from config.toml
pub mod settings;
