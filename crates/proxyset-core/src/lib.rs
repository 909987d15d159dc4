//! Proxyset Core - System-wide proxy configuration engine.
//!
//! This crate writes one proxy configuration to every place a Linux
//! system reads proxy settings from, and can detect and strip what is
//! already there. It covers:
//!
//! - Shell profiles (lower/UPPER `*_proxy` exports plus a `profile.d` snippet)
//! - The PAM login environment (`/etc/environment`)
//! - APT's `Acquire::*::proxy` directives
//! - The GNOME desktop proxy store (via `gsettings`)
//! - Sudo's `env_keep` passthrough (`/etc/sudoers.d` fragment)
//!
//! Targets run in a fixed order and a failing target never aborts the
//! batch; see [`ProxyManager`].
//!
//! # Example
//!
//! ```no_run
//! use proxyset_core::{ProxyConfig, ProxyEntry, ProxyManager, SystemPaths};
//!
//! let paths = SystemPaths::from_env().unwrap();
//! let config = ProxyConfig::new(vec![ProxyEntry::new("http", "proxy.example.com", 3128)])
//!     .with_bypass_hosts(vec!["localhost".to_string()]);
//!
//! let manager = ProxyManager::new(paths);
//! manager.apply_all(&config, true);
//! ```

pub mod config;
pub mod confirm;
pub mod error;
pub mod events;
pub mod manager;
pub mod paths;
pub mod targets;
mod textfile;

pub use config::{Credentials, ProxyConfig, ProxyEntry, DEFAULT_PORT};
pub use confirm::{prompt_channel, ChannelPrompt, OverwritePrompt, PromptRequest};
pub use error::{Result, TargetError};
pub use events::{BatchEvent, EventCallback, EventLevel};
pub use manager::{BatchOutcome, Detection, DetectionReport, ProxyManager, TargetFailure};
pub use paths::SystemPaths;
pub use targets::{default_bypass_hosts, ProxyTarget, TargetKind};
