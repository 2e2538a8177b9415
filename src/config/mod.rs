/// Database configuration and connection management
pub mod database;

/// Reference catalog loading and seeding from catalog.toml
pub mod catalog;
