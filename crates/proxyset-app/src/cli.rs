//! CLI argument definitions for proxyset
//!
//! Uses clap for argument parsing. The caller-layer rules live here too:
//! default-port substitution, credential pairing, and the bypass-list
//! override, so the engine only ever sees a finished [`ProxyConfig`].

use clap::{Parser, Subcommand};

use proxyset_core::{Credentials, ProxyConfig, ProxyEntry, DEFAULT_PORT};

/// The protocols an endpoint can be configured for.
pub const PROTOCOLS: [&str; 4] = ["http", "https", "ftp", "socks"];

/// proxyset - system-wide proxy configuration
///
/// Writes one proxy configuration to every place a Linux system reads
/// proxy settings from: shell profiles, the login environment, APT,
/// the GNOME desktop store, and sudoers.
#[derive(Parser, Debug)]
#[command(name = "proxyset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (implies a console log mirror)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan every target for existing proxy settings
    Check,

    /// Write a proxy configuration to every target
    #[command(after_help = "EXAMPLES:
    # Same endpoint for every protocol, default port
    proxyset apply --all proxy.example.com

    # Distinct endpoints, credentials on HTTP only
    proxyset apply --http 10.0.0.1:3128 --ftp 10.0.0.1:2121 \\
        --user alice --password s3cret --auth-for http

    # Custom bypass list instead of the desktop's current one
    proxyset apply --all proxy.example.com:3128 --bypass localhost,127.0.0.0/8

    # No bypass values at all
    proxyset apply --all proxy.example.com:3128 --bypass \"\"
")]
    Apply(Box<ApplyArgs>),

    /// Strip proxy settings from every target
    Remove(RemoveArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyArgs {
    /// Proxy endpoint for every protocol
    #[arg(
        long,
        value_name = "HOST[:PORT]",
        conflicts_with_all = ["http", "https", "ftp", "socks"]
    )]
    pub all: Option<String>,

    /// HTTP proxy endpoint
    #[arg(long, value_name = "HOST[:PORT]")]
    pub http: Option<String>,

    /// HTTPS proxy endpoint
    #[arg(long, value_name = "HOST[:PORT]")]
    pub https: Option<String>,

    /// FTP proxy endpoint
    #[arg(long, value_name = "HOST[:PORT]")]
    pub ftp: Option<String>,

    /// SOCKS proxy endpoint
    #[arg(long, value_name = "HOST[:PORT]")]
    pub socks: Option<String>,

    /// Username embedded in proxy URLs
    #[arg(long, value_name = "USER", requires = "password")]
    pub user: Option<String>,

    /// Password embedded in proxy URLs
    #[arg(long, value_name = "PASSWORD", requires = "user")]
    pub password: Option<String>,

    /// Protocols whose URLs embed the credentials (default: all configured)
    #[arg(long, value_name = "PROTO", value_delimiter = ',')]
    pub auth_for: Vec<String>,

    /// Comma-separated bypass hosts; pass "" to write none
    /// (default: the desktop's current ignore list)
    #[arg(long, value_name = "HOSTS")]
    pub bypass: Option<String>,

    /// Overwrite detected settings without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Remove without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ApplyArgs {
    /// Builds the engine configuration, bypass list excluded.
    ///
    /// The bypass list needs the desktop's current values as a default,
    /// so [`ApplyArgs::bypass_hosts`] is resolved by the caller.
    pub fn to_config(&self) -> anyhow::Result<ProxyConfig> {
        let per_protocol = [
            ("http", self.http.as_deref().or(self.all.as_deref())),
            ("https", self.https.as_deref().or(self.all.as_deref())),
            ("ftp", self.ftp.as_deref().or(self.all.as_deref())),
            ("socks", self.socks.as_deref().or(self.all.as_deref())),
        ];

        let mut entries = Vec::new();
        for (protocol, endpoint) in per_protocol {
            if let Some(endpoint) = endpoint {
                let (host, port) = parse_endpoint(endpoint)?;
                entries.push(ProxyEntry::new(protocol, host, port));
            }
        }
        if entries.is_empty() {
            anyhow::bail!(
                "no proxy endpoint given; use --all or at least one of --http/--https/--ftp/--socks"
            );
        }

        let mut config = ProxyConfig::new(entries);
        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            config = config.with_credentials(Credentials::new(user, password));
        }
        if !self.auth_for.is_empty() {
            if config.credentials.is_none() {
                anyhow::bail!("--auth-for needs --user and --password");
            }
            for protocol in &self.auth_for {
                if !config.entries.iter().any(|e| &e.protocol == protocol) {
                    anyhow::bail!(
                        "--auth-for names '{}' but no {} endpoint is configured",
                        protocol,
                        protocol
                    );
                }
            }
            config = config.with_auth_protocols(self.auth_for.clone());
        }
        Ok(config)
    }

    /// The explicit bypass list, or `None` when the desktop's current
    /// values should be used.
    pub fn bypass_hosts(&self) -> Option<Vec<String>> {
        self.bypass.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Splits `HOST[:PORT]`, substituting [`DEFAULT_PORT`] when no port is given.
fn parse_endpoint(endpoint: &str) -> anyhow::Result<(String, u16)> {
    let (host, port) = match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("invalid port in '{}'", endpoint))?;
            (host, port)
        }
        None => (endpoint, DEFAULT_PORT),
    };
    if host.is_empty() {
        anyhow::bail!("missing host in '{}'", endpoint);
    }
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_args(argv: &[&str]) -> ApplyArgs {
        let mut full = vec!["proxyset", "apply"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Apply(args) => *args,
            _ => panic!("Expected Apply command"),
        }
    }

    // ==================== Endpoint Tests ====================

    #[test]
    fn test_all_sets_every_protocol() {
        let config = apply_args(&["--all", "proxy.example.com:3128"])
            .to_config()
            .unwrap();
        let protocols: Vec<&str> = config.entries.iter().map(|e| e.protocol.as_str()).collect();
        assert_eq!(protocols, PROTOCOLS);
        assert!(config.entries.iter().all(|e| e.port == 3128));
    }

    #[test]
    fn test_missing_port_uses_default() {
        let config = apply_args(&["--http", "10.0.0.1"]).to_config().unwrap();
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.entries[0].port, DEFAULT_PORT);
    }

    #[test]
    fn test_distinct_endpoints() {
        let config = apply_args(&["--http", "a:3128", "--ftp", "b:2121"])
            .to_config()
            .unwrap();
        assert_eq!(config.entries.len(), 2);
        assert_eq!(config.entries[0].host, "a");
        assert_eq!(config.entries[1].host, "b");
        assert_eq!(config.entries[1].port, 2121);
    }

    #[test]
    fn test_no_endpoint_is_an_error() {
        assert!(apply_args(&[]).to_config().is_err());
    }

    #[test]
    fn test_bad_port_is_an_error() {
        assert!(apply_args(&["--http", "host:notaport"]).to_config().is_err());
        assert!(apply_args(&["--http", "host:"]).to_config().is_err());
    }

    #[test]
    fn test_missing_host_is_an_error() {
        assert!(apply_args(&["--http", ":3128"]).to_config().is_err());
    }

    #[test]
    fn test_all_conflicts_with_per_protocol_flags() {
        let result = Cli::try_parse_from(["proxyset", "apply", "--all", "a", "--http", "b"]);
        assert!(result.is_err());
    }

    // ==================== Credential Tests ====================

    #[test]
    fn test_user_requires_password() {
        let result = Cli::try_parse_from(["proxyset", "apply", "--all", "a", "--user", "alice"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_end_up_in_config() {
        let config = apply_args(&["--all", "a", "--user", "alice", "--password", "pw"])
            .to_config()
            .unwrap();
        assert_eq!(config.credentials, Some(Credentials::new("alice", "pw")));
    }

    #[test]
    fn test_auth_for_without_credentials_is_an_error() {
        assert!(apply_args(&["--all", "a", "--auth-for", "http"])
            .to_config()
            .is_err());
    }

    #[test]
    fn test_auth_for_unconfigured_protocol_is_an_error() {
        let args = apply_args(&[
            "--http", "a", "--user", "u", "--password", "p", "--auth-for", "ftp",
        ]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_auth_for_splits_on_commas() {
        let config = apply_args(&[
            "--all", "a", "--user", "u", "--password", "p", "--auth-for", "http,ftp",
        ])
        .to_config()
        .unwrap();
        assert_eq!(config.auth_protocols, vec!["http", "ftp"]);
    }

    // ==================== Bypass Tests ====================

    #[test]
    fn test_bypass_absent_defers_to_desktop() {
        assert_eq!(apply_args(&["--all", "a"]).bypass_hosts(), None);
    }

    #[test]
    fn test_bypass_empty_string_means_no_hosts() {
        let args = apply_args(&["--all", "a", "--bypass", ""]);
        assert_eq!(args.bypass_hosts(), Some(Vec::new()));
    }

    #[test]
    fn test_bypass_splits_and_trims() {
        let args = apply_args(&["--all", "a", "--bypass", "localhost, 127.0.0.0/8 ,"]);
        assert_eq!(
            args.bypass_hosts(),
            Some(vec!["localhost".to_string(), "127.0.0.0/8".to_string()])
        );
    }

    // ==================== Subcommand Tests ====================

    #[test]
    fn test_check_with_global_json() {
        let cli = Cli::parse_from(["proxyset", "check", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_remove_yes_flag() {
        let cli = Cli::parse_from(["proxyset", "remove", "-y"]);
        match cli.command {
            Commands::Remove(args) => assert!(args.yes),
            _ => panic!("Expected Remove command"),
        }
    }
}
