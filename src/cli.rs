//! Command-line interface parsing for TrueSignal
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`] for the driver.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_EXPIRY_MINUTES;
use crate::data::{OrderFilter, StatusFilter};
use crate::feed::DEFAULT_FEED_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The status filter is not recognized
    #[error("Invalid status: '{0}'. Valid statuses: all, open, closed")]
    InvalidStatus(String),
}

/// TrueSignal - follow TrueSignals trading orders from the terminal
#[derive(Parser, Debug)]
#[command(name = "truesignal")]
#[command(about = "TrueSignals order tracker with offline cache")]
#[command(version)]
pub struct Cli {
    /// Feed URL returning the orders JSON
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub url: String,

    /// Seconds between automatic refreshes
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub interval: u32,

    /// Request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub timeout: u32,

    /// Directory for the order cache (defaults to the XDG cache directory)
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Minutes after which cached orders are no longer shown
    #[arg(
        long,
        value_name = "MINUTES",
        default_value_t = DEFAULT_EXPIRY_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub expiry_mins: u32,

    /// Show only orders with this status
    ///
    /// Valid statuses: all, open, closed
    #[arg(long, value_name = "STATUS", default_value = "all")]
    pub status: String,

    /// Show only orders whose symbol contains this text
    #[arg(long, value_name = "TEXT")]
    pub symbol: Option<String>,

    /// Fetch once, print the orders and exit
    #[arg(long)]
    pub once: bool,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

/// Where the order cache lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// XDG cache directory
    Default,
    /// A specific directory
    Dir(PathBuf),
    /// Process memory only
    Memory,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub url: String,
    pub interval: Duration,
    pub timeout: Duration,
    pub cache: CacheLocation,
    pub expiry: chrono::Duration,
    pub filter: OrderFilter,
    pub once: bool,
    pub log_level: String,
}

/// Parses a status filter argument.
///
/// # Returns
/// * `Ok(StatusFilter)` if the string names a valid filter
/// * `Err(CliError::InvalidStatus)` if it doesn't
pub fn parse_status_arg(s: &str) -> Result<StatusFilter, CliError> {
    StatusFilter::from_str(s).ok_or_else(|| CliError::InvalidStatus(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Durations are range-checked by clap, so only the status can fail here.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cache = match (&cli.cache_dir, cli.no_cache) {
            (_, true) => CacheLocation::Memory,
            (Some(dir), false) => CacheLocation::Dir(dir.clone()),
            (None, false) => CacheLocation::Default,
        };

        let symbol = cli
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            url: cli.url.clone(),
            interval: Duration::from_secs(u64::from(cli.interval)),
            timeout: Duration::from_secs(u64::from(cli.timeout)),
            cache,
            expiry: chrono::Duration::minutes(i64::from(cli.expiry_mins)),
            filter: OrderFilter {
                status: parse_status_arg(&cli.status)?,
                symbol,
            },
            once: cli.once,
            log_level: cli.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_arg_valid() {
        assert_eq!(parse_status_arg("all").unwrap(), StatusFilter::All);
        assert_eq!(parse_status_arg("open").unwrap(), StatusFilter::Open);
        assert_eq!(parse_status_arg("Closed").unwrap(), StatusFilter::Closed);
    }

    #[test]
    fn test_parse_status_arg_invalid() {
        let result = parse_status_arg("pending");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid status"));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["truesignal"]);
        assert_eq!(cli.url, DEFAULT_FEED_URL);
        assert_eq!(cli.interval, 30);
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.expiry_mins, 30);
        assert_eq!(cli.status, "all");
        assert!(!cli.once);
        assert!(!cli.no_cache);
    }

    #[test]
    fn test_startup_config_defaults() {
        let cli = Cli::parse_from(["truesignal"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.expiry, chrono::Duration::minutes(30));
        assert_eq!(config.cache, CacheLocation::Default);
        assert_eq!(config.filter, OrderFilter::default());
    }

    #[test]
    fn test_startup_config_with_filters() {
        let cli = Cli::parse_from([
            "truesignal",
            "--status",
            "open",
            "--symbol",
            " usd ",
            "--once",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.filter.status, StatusFilter::Open);
        assert_eq!(config.filter.symbol.as_deref(), Some("usd"));
        assert!(config.once);
    }

    #[test]
    fn test_startup_config_cache_locations() {
        let cli = Cli::parse_from(["truesignal", "--cache-dir", "/tmp/orders"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache, CacheLocation::Dir(PathBuf::from("/tmp/orders")));

        let cli = Cli::parse_from(["truesignal", "--no-cache"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache, CacheLocation::Memory);
    }

    #[test]
    fn test_no_cache_conflicts_with_cache_dir() {
        let result = Cli::try_parse_from(["truesignal", "--no-cache", "--cache-dir", "/tmp/x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        for flag in ["--interval", "--timeout", "--expiry-mins"] {
            let result = Cli::try_parse_from(["truesignal", flag, "0"]);
            assert!(result.is_err(), "{} 0 should be rejected", flag);
        }
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        for value in ["4294967296", "9223372036854775807", "18446744073709551615"] {
            for flag in ["--interval", "--timeout", "--expiry-mins"] {
                let result = Cli::try_parse_from(["truesignal", flag, value]);
                assert!(result.is_err(), "{} {} should be rejected", flag, value);
            }
        }
    }

    #[test]
    fn test_largest_expiry_builds_a_positive_window() {
        let cli = Cli::parse_from(["truesignal", "--expiry-mins", "4294967295"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.expiry, chrono::Duration::minutes(4_294_967_295));
        assert!(config.expiry > chrono::Duration::zero());
    }

    #[test]
    fn test_startup_config_rejects_invalid_status() {
        let cli = Cli::parse_from(["truesignal", "--status", "bekliyor"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidStatus(_))
        ));
    }
}
