//! The five configuration surfaces and the capability interface they share.

mod apt;
mod desktop;
mod login_env;
mod shell;
mod sudoers;

pub use apt::AptTarget;
pub use desktop::{default_bypass_hosts, DesktopTarget};
pub use login_env::LoginEnvTarget;
pub use shell::ShellProfileTarget;
pub use sudoers::SudoersTarget;

use serde::{Deserialize, Serialize};

use crate::config::ProxyConfig;
use crate::error::Result;

/// The configuration surfaces, in batch-execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Bash and POSIX profile files.
    #[serde(rename = "bash")]
    ShellProfile,

    /// The PAM login environment file.
    #[serde(rename = "environment")]
    LoginEnvironment,

    /// APT's acquire configuration.
    Apt,

    /// The GNOME desktop proxy store.
    #[serde(rename = "gsettings")]
    Desktop,

    /// The sudo environment-keep list.
    Sudoers,
}

impl TargetKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShellProfile => "bash",
            Self::LoginEnvironment => "environment",
            Self::Apt => "apt",
            Self::Desktop => "gsettings",
            Self::Sudoers => "sudoers",
        }
    }

    /// Returns a human-readable name for the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShellProfile => "Shell profiles",
            Self::LoginEnvironment => "Login environment",
            Self::Apt => "APT package manager",
            Self::Desktop => "Desktop settings",
            Self::Sudoers => "Sudoers passthrough",
        }
    }

    /// All kinds in batch-execution order.
    pub fn all() -> &'static [TargetKind] {
        &[
            Self::ShellProfile,
            Self::LoginEnvironment,
            Self::Apt,
            Self::Desktop,
            Self::Sudoers,
        ]
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One configuration surface proxy settings are written to.
///
/// Adapters are stateless beyond their path table; all three operations
/// may be called in any order and tolerate files that do not exist yet.
pub trait ProxyTarget: Send + Sync {
    /// Which surface this adapter edits.
    fn kind(&self) -> TargetKind;

    /// Locations currently carrying proxy content, empty when clean.
    fn detect(&self) -> Result<Vec<String>>;

    /// Write the configuration to this surface.
    fn apply(&self, config: &ProxyConfig) -> Result<()>;

    /// Strip proxy content from this surface. No-op when already clean.
    fn remove(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_is_fixed() {
        let kinds: Vec<&str> = TargetKind::all().iter().map(|k| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["bash", "environment", "apt", "gsettings", "sudoers"]
        );
    }

    #[test]
    fn test_kind_serializes_to_short_name() {
        let json = serde_json::to_string(&TargetKind::ShellProfile).unwrap();
        assert_eq!(json, "\"bash\"");
        let json = serde_json::to_string(&TargetKind::Desktop).unwrap();
        assert_eq!(json, "\"gsettings\"");
    }
}
