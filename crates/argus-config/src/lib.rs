//! Typed configuration for Argus.
//!
//! - TOML and JSON configuration files
//! - `ARGUS__SECTION__KEY` environment variable overrides, optionally read
//!   from a `.env` file
//! - Strict validation (fails on unknown fields)
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! request_timeout_ms = 30000
//! shutdown_timeout_secs = 30
//!
//! [parser]
//! default_locations = ["querystring", "form", "json"]
//! error_status = 422
//! max_body_size = 1048576
//! blank_json_is_missing = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::ArgusConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LoggingConfig, ParserSection, ServerConfig};
