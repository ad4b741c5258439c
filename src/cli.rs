//! CLI definitions for quictun.

use clap::{builder::PossibleValuesParser, Parser};
use std::net::SocketAddr;
use std::time::Duration;

/// Default ALPN protocol identifier.
pub const DEFAULT_ALPN: &str = "quictun/1";

/// Default QUIC listen address.
pub const DEFAULT_LISTEN: &str = "localhost:4343";

/// Default TCP backend address.
pub const DEFAULT_BACKEND: &str = "localhost:1935";

/// Parse a duration from a human-readable string.
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// QUIC to TCP tunnel endpoint.
#[derive(Debug, Parser)]
#[command(name = "quictun")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// QUIC listen address (host:port)
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// TCP backend address (host:port)
    #[arg(long, default_value = DEFAULT_BACKEND)]
    pub backend: String,

    /// Log level (debug|info|warn|error)
    #[arg(long, default_value = "info", value_parser = PossibleValuesParser::new(["debug", "info", "warn", "error"]))]
    pub log_level: String,

    /// ALPN protocol identifier
    #[arg(long, default_value = DEFAULT_ALPN)]
    pub alpn: String,

    /// Backend dial timeout
    #[arg(long, value_parser = parse_duration, default_value = "10s")]
    pub dial_timeout: Duration,

    /// QUIC idle timeout
    #[arg(long, value_parser = parse_duration, default_value = "10s")]
    pub idle_timeout: Duration,

    /// QUIC keep-alive interval (0 to disable)
    #[arg(long, value_parser = parse_duration, default_value = "3s")]
    pub keep_alive: Duration,

    /// Admin HTTP listen address for runtime log level control (disabled unless set)
    #[arg(long)]
    pub admin_listen: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["quictun"]).unwrap();

        assert_eq!(cli.listen, DEFAULT_LISTEN);
        assert_eq!(cli.backend, DEFAULT_BACKEND);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.alpn, DEFAULT_ALPN);
        assert_eq!(cli.dial_timeout, Duration::from_secs(10));
        assert_eq!(cli.idle_timeout, Duration::from_secs(10));
        assert_eq!(cli.keep_alive, Duration::from_secs(3));
        assert!(cli.admin_listen.is_none());
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "quictun",
            "--listen",
            ":4444",
            "--backend",
            "127.0.0.1:22",
            "--log-level",
            "debug",
            "--alpn",
            "custom/1",
            "--dial-timeout",
            "5s",
            "--idle-timeout",
            "30s",
            "--keep-alive",
            "5s",
            "--admin-listen",
            "127.0.0.1:9090",
        ])
        .unwrap();

        assert_eq!(cli.listen, ":4444");
        assert_eq!(cli.backend, "127.0.0.1:22");
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.alpn, "custom/1");
        assert_eq!(cli.dial_timeout, Duration::from_secs(5));
        assert_eq!(cli.idle_timeout, Duration::from_secs(30));
        assert_eq!(cli.keep_alive, Duration::from_secs(5));
        assert_eq!(
            cli.admin_listen,
            Some("127.0.0.1:9090".parse::<SocketAddr>().unwrap())
        );
    }

    #[test]
    fn test_duration_parsing() {
        let cli = Cli::try_parse_from([
            "quictun",
            "--dial-timeout",
            "1m30s",
            "--keep-alive",
            "500ms",
        ])
        .unwrap();

        assert_eq!(cli.dial_timeout, Duration::from_secs(90));
        assert_eq!(cli.keep_alive, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Cli::try_parse_from(["quictun", "--log-level", "verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_admin_listen_rejected() {
        let result = Cli::try_parse_from(["quictun", "--admin-listen", "not-an-address"]);
        assert!(result.is_err());
    }
}
