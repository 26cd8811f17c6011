//! Command line configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// All the ways configuration can be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host id {0:?}: must be non-empty and free of '|' and ';'")]
    InvalidHostId(String),

    #[error("interval must be greater than zero")]
    ZeroInterval,
}

/// Periodically report this host's connections as topology fragments.
///
/// Each build is written to stdout as one JSON document per line; logs go to
/// stderr.
#[derive(Debug, Parser)]
#[command(name = "topology-probe", version)]
pub struct CliConfig {
    /// Stable identifier of this host, used to scope loopback addresses.
    #[arg(long)]
    pub host_id: String,

    /// Display name of this host (defaults to the host id).
    #[arg(long)]
    pub host_name: Option<String>,

    /// Build the process-level topology as well.
    #[arg(long)]
    pub processes: bool,

    /// JSON file holding the connection snapshot, re-read on every build.
    #[arg(long)]
    pub connections: PathBuf,

    /// Milliseconds between builds; also the deadline of each build.
    #[arg(long, default_value_t = 3000)]
    pub interval_ms: u64,

    /// Run a single build and exit.
    #[arg(long)]
    pub once: bool,

    /// error, warn, info, debug or trace.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl CliConfig {
    /// Reject settings the probe cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        report::validate_host_id(&self.host_id)
            .map_err(|_| ConfigError::InvalidHostId(self.host_id.clone()))?;
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn host_name(&self) -> &str {
        self.host_name.as_deref().unwrap_or(&self.host_id)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["topology-probe", "--connections", "conns.json"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(&["--host-id", "h1"]);
        assert_eq!(cfg.host_name(), "h1");
        assert_eq!(cfg.interval(), Duration::from_secs(3));
        assert_eq!(cfg.log_level, Level::INFO);
        assert!(!cfg.processes);
        assert!(!cfg.once);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let cfg = parse(&[
            "--host-id", "h1", "--host-name", "web-1", "--processes", "--once",
            "--interval-ms", "500", "--log-level", "debug",
        ]);
        assert_eq!(cfg.host_name(), "web-1");
        assert_eq!(cfg.interval(), Duration::from_millis(500));
        assert_eq!(cfg.log_level, Level::DEBUG);
        assert!(cfg.processes && cfg.once);
    }

    #[test]
    fn test_rejects_delimiter_in_host_id() {
        let cfg = parse(&["--host-id", "a;b"]);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidHostId(ref id)) if id == "a;b"));
        assert_eq!(
            cfg.validate().unwrap_err().to_string(),
            "invalid host id \"a;b\": must be non-empty and free of '|' and ';'"
        );
    }

    #[test]
    fn test_rejects_zero_interval() {
        let cfg = parse(&["--host-id", "h1", "--interval-ms", "0"]);
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_host_id_required() {
        assert!(CliConfig::try_parse_from(["topology-probe", "--connections", "c.json"]).is_err());
    }
}
