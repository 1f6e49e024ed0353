//! Configuration module for Placement-Bot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the bot also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use placement_bot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bot.toml")).unwrap();
//! println!("Portal timeout: {}s", config.portal.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BotConfig, Config, DedupConfig, PortalConfig, DEFAULT_PORTAL_ENDPOINT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
