//! Desktop-settings target: the GNOME proxy store, driven via `gsettings`.
//!
//! This target never touches dconf storage directly; everything goes
//! through discrete `gsettings` invocations. Individual command failures
//! are logged but never inspected, matching the aggregation policy of the
//! batch layer.

use std::process::Command;

use crate::config::ProxyConfig;
use crate::error::Result;

use super::{ProxyTarget, TargetKind};

/// The settings namespace all proxy keys live under.
const PROXY_SCHEMA: &str = "org.gnome.system.proxy";

/// Last-token values that mean a key is still at its unset default.
const UNSET_SENTINELS: &[&str] = &["true", "false", "''", "\"\""];

/// Adapter for the GNOME desktop proxy store.
#[derive(Default)]
pub struct DesktopTarget;

impl DesktopTarget {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

/// Whether one `list-recursively` output line shows a configured value.
fn line_is_configured(line: &str) -> bool {
    match line.split_whitespace().last() {
        Some(token) => !UNSET_SENTINELS.contains(&token),
        None => false,
    }
}

/// The `gsettings` argument lists one apply issues, in order.
fn apply_commands(config: &ProxyConfig) -> Vec<Vec<String>> {
    let set = |schema: &str, key: &str, value: &str| {
        vec![
            "set".to_string(),
            schema.to_string(),
            key.to_string(),
            value.to_string(),
        ]
    };

    let mut commands = vec![set(PROXY_SCHEMA, "mode", "manual")];
    for entry in &config.entries {
        let schema = format!("{}.{}", PROXY_SCHEMA, entry.protocol);
        commands.push(set(&schema, "host", &entry.host));
        commands.push(set(&schema, "port", &entry.port.to_string()));
    }

    // Only the http namespace stores credentials in this schema.
    let http_schema = format!("{}.http", PROXY_SCHEMA);
    match &config.credentials {
        Some(credentials) => {
            commands.push(set(&http_schema, "use-authentication", "true"));
            commands.push(set(&http_schema, "authentication-user", &credentials.user));
            commands.push(set(
                &http_schema,
                "authentication-password",
                &credentials.password,
            ));
        }
        None => commands.push(set(&http_schema, "use-authentication", "false")),
    }

    if !config.bypass_hosts.is_empty() {
        let quoted: Vec<String> = config
            .bypass_hosts
            .iter()
            .map(|host| format!("'{}'", host))
            .collect();
        commands.push(set(
            PROXY_SCHEMA,
            "ignore-hosts",
            &format!("[{}]", quoted.join(", ")),
        ));
    }
    commands
}

/// Run one `gsettings` invocation, logging rather than raising failures.
fn run_gsettings(args: &[String]) {
    match Command::new("gsettings").args(args).output() {
        Ok(output) if !output.status.success() => {
            tracing::debug!("gsettings {} exited with {}", args.join(" "), output.status);
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("failed to run gsettings: {}", e),
    }
}

/// The bypass hosts currently configured in the desktop store.
///
/// Used by callers to pre-fill a configuration when the user supplies no
/// bypass list of their own. A failing query yields an empty list.
pub fn default_bypass_hosts() -> Vec<String> {
    let output = match Command::new("gsettings")
        .args(["get", PROXY_SCHEMA, "ignore-hosts"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!("gsettings get ignore-hosts exited with {}", output.status);
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("failed to run gsettings: {}", e);
            return Vec::new();
        }
    };
    parse_quoted_hosts(&String::from_utf8_lossy(&output.stdout))
}

/// Pull the single-quoted items out of a GVariant list literal.
fn parse_quoted_hosts(raw: &str) -> Vec<String> {
    raw.split('\'')
        .enumerate()
        .filter(|(i, _)| i % 2 == 1)
        .map(|(_, host)| host.to_string())
        .collect()
}

impl ProxyTarget for DesktopTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Desktop
    }

    fn detect(&self) -> Result<Vec<String>> {
        let output = match Command::new("gsettings")
            .args(["list-recursively", PROXY_SCHEMA])
            .output()
        {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                tracing::debug!("gsettings list-recursively exited with {}", output.status);
                return Ok(vec![]);
            }
            Err(e) => {
                tracing::debug!("failed to run gsettings: {}", e);
                return Ok(vec![]);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.lines().any(line_is_configured) {
            Ok(vec![PROXY_SCHEMA.to_string()])
        } else {
            Ok(vec![])
        }
    }

    fn apply(&self, config: &ProxyConfig) -> Result<()> {
        for command in apply_commands(config) {
            run_gsettings(&command);
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        run_gsettings(&[
            "reset-recursively".to_string(),
            PROXY_SCHEMA.to_string(),
        ]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, ProxyEntry};

    fn sample_config() -> ProxyConfig {
        ProxyConfig::new(vec![
            ProxyEntry::new("http", "proxy.example.com", 3128),
            ProxyEntry::new("socks", "socks.example.com", 1080),
        ])
    }

    fn flat(commands: &[Vec<String>]) -> Vec<String> {
        commands.iter().map(|c| c.join(" ")).collect()
    }

    // ==================== Command Plan Tests ====================

    #[test]
    fn test_apply_plan_starts_with_manual_mode() {
        let commands = apply_commands(&sample_config());
        assert_eq!(
            commands[0],
            vec!["set", "org.gnome.system.proxy", "mode", "manual"]
        );
    }

    #[test]
    fn test_apply_plan_sets_host_and_port_per_protocol() {
        let plan = flat(&apply_commands(&sample_config()));
        assert!(plan.contains(&"set org.gnome.system.proxy.http host proxy.example.com".to_string()));
        assert!(plan.contains(&"set org.gnome.system.proxy.http port 3128".to_string()));
        assert!(plan.contains(&"set org.gnome.system.proxy.socks host socks.example.com".to_string()));
        assert!(plan.contains(&"set org.gnome.system.proxy.socks port 1080".to_string()));
    }

    #[test]
    fn test_apply_plan_without_credentials_disables_auth() {
        let plan = flat(&apply_commands(&sample_config()));
        assert!(plan
            .contains(&"set org.gnome.system.proxy.http use-authentication false".to_string()));
        assert!(!plan.iter().any(|c| c.contains("authentication-user")));
    }

    #[test]
    fn test_apply_plan_with_credentials_sets_http_auth_keys() {
        let config = sample_config().with_credentials(Credentials::new("alice", "s3cret"));
        let plan = flat(&apply_commands(&config));
        assert!(
            plan.contains(&"set org.gnome.system.proxy.http use-authentication true".to_string())
        );
        assert!(plan
            .contains(&"set org.gnome.system.proxy.http authentication-user alice".to_string()));
        assert!(plan.contains(
            &"set org.gnome.system.proxy.http authentication-password s3cret".to_string()
        ));
    }

    #[test]
    fn test_apply_plan_renders_bypass_as_list_literal() {
        let config = sample_config()
            .with_bypass_hosts(vec!["localhost".to_string(), "127.0.0.0/8".to_string()]);
        let commands = apply_commands(&config);
        let ignore = commands.last().unwrap();
        assert_eq!(ignore[2], "ignore-hosts");
        assert_eq!(ignore[3], "['localhost', '127.0.0.0/8']");
    }

    // ==================== Detection Line Tests ====================

    #[test]
    fn test_unset_values_are_not_configured() {
        assert!(!line_is_configured("org.gnome.system.proxy use-same-proxy true"));
        assert!(!line_is_configured("org.gnome.system.proxy.http enabled false"));
        assert!(!line_is_configured("org.gnome.system.proxy autoconfig-url ''"));
        assert!(!line_is_configured("org.gnome.system.proxy.http host \"\""));
        assert!(!line_is_configured(""));
    }

    #[test]
    fn test_real_values_are_configured() {
        assert!(line_is_configured("org.gnome.system.proxy.http host 'proxy.example.com'"));
        assert!(line_is_configured("org.gnome.system.proxy.http port 3128"));
        assert!(line_is_configured("org.gnome.system.proxy mode 'manual'"));
    }

    // ==================== ignore-hosts Parsing Tests ====================

    #[test]
    fn test_parse_quoted_hosts() {
        let raw = "['localhost', '127.0.0.0/8', '::1']\n";
        assert_eq!(
            parse_quoted_hosts(raw),
            vec!["localhost", "127.0.0.0/8", "::1"]
        );
    }

    #[test]
    fn test_parse_empty_typed_array() {
        assert_eq!(parse_quoted_hosts("@as []\n"), Vec::<String>::new());
    }
}
