//! Privilege-passthrough target: sudo's `env_keep` list.
//!
//! sudo strips the environment on privilege elevation, so the proxy
//! variables are marked for retention in a fragment under `sudoers.d`.
//!
//! CAUTION: a malformed sudoers tree can lock administrators out. This
//! adapter only ever appends the includedir directive or strips lines
//! containing the proxy phrases; it never rewrites unrelated content.

use std::fs::{OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use crate::config::ProxyConfig;
use crate::error::{Result, TargetError};
use crate::paths::SystemPaths;
use crate::textfile;

use super::{ProxyTarget, TargetKind};

/// No `=` here: sudoers syntax lists variable names without assignment.
const PHRASES: &[&str] = &["_proxy", "_PROXY"];

/// The fragment grants environment passthrough across a security
/// boundary, so it is never world-readable, not even between create and
/// first write.
const FRAGMENT_MODE: u32 = 0o440;

/// Adapter for the sudo environment-keep list.
pub struct SudoersTarget {
    paths: SystemPaths,
}

impl SudoersTarget {
    /// Create the adapter over the given path table.
    pub fn new(paths: SystemPaths) -> Self {
        Self { paths }
    }
}

/// Render the fragment content: one `env_keep` directive naming the
/// lower/upper variable pair for every protocol.
fn render_env_keep(config: &ProxyConfig) -> String {
    let mut pairs: Vec<String> = config
        .entries
        .iter()
        .map(|entry| {
            format!(
                "{}_proxy {}_PROXY",
                entry.protocol,
                entry.protocol.to_uppercase()
            )
        })
        .collect();
    if !config.bypass_hosts.is_empty() {
        pairs.push("no_proxy NO_PROXY".to_string());
    }
    format!("\nDefaults env_keep += \"{}\"\n", pairs.join(" "))
}

impl ProxyTarget for SudoersTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Sudoers
    }

    fn detect(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for path in [&self.paths.sudoers, &self.paths.sudoers_fragment] {
            if textfile::contains_any_phrase(path, PHRASES)? {
                found.push(path.display().to_string());
            }
        }
        Ok(found)
    }

    fn apply(&self, config: &ProxyConfig) -> Result<()> {
        let dir = self.paths.sudoers_dir.display().to_string();
        textfile::ensure_block(
            &self.paths.sudoers,
            |line| line.contains("#includedir") && line.contains(&dir),
            &format!("#includedir {}", dir),
        )?;
        textfile::create_dir_if_missing(&self.paths.sudoers_dir)?;

        // Recreate from scratch, never looser than the final mode at any point.
        textfile::remove_file_if_exists(&self.paths.sudoers_fragment)?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .mode(FRAGMENT_MODE)
            .open(&self.paths.sudoers_fragment)
            .map_err(|e| TargetError::SecureCreate {
                path: self.paths.sudoers_fragment.clone(),
                mode: FRAGMENT_MODE,
                source: e,
            })?;
        file.write_all(render_env_keep(config).as_bytes())
            .map_err(|e| TargetError::Write {
                path: self.paths.sudoers_fragment.clone(),
                source: e,
            })?;
        // The create mode is umask-filtered, so pin the exact bits afterwards.
        std::fs::set_permissions(
            &self.paths.sudoers_fragment,
            Permissions::from_mode(FRAGMENT_MODE),
        )
        .map_err(|e| TargetError::SecureCreate {
            path: self.paths.sudoers_fragment.clone(),
            mode: FRAGMENT_MODE,
            source: e,
        })?;
        tracing::debug!(
            "Wrote {} with mode {:03o}",
            self.paths.sudoers_fragment.display(),
            FRAGMENT_MODE
        );
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if textfile::contains_any_phrase(&self.paths.sudoers, PHRASES)? {
            textfile::remove_matching_lines(&self.paths.sudoers, PHRASES)?;
        }
        textfile::remove_file_if_exists(&self.paths.sudoers_fragment)
    }
}
