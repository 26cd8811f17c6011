//! Command line driver for the topology probe.
//!
//! Provides:
//! - Configuration parsing and validation
//! - Periodic builds with a per-build deadline
//! - JSON line output of each report

pub mod commands;
pub mod config;

pub use commands::emit;
pub use config::{CliConfig, ConfigError};
