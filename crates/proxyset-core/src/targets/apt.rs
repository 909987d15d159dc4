//! Package-manager target: `Acquire::*::proxy` directives for APT.
//!
//! Settings live in a fragment this tool owns outright, so apply is a
//! whole-file overwrite instead of an append.

use crate::config::ProxyConfig;
use crate::error::{Result, TargetError};
use crate::paths::SystemPaths;
use crate::textfile;

use super::{ProxyTarget, TargetKind};

const PHRASES: &[&str] = &["::proxy"];

/// Adapter for APT's acquire configuration.
pub struct AptTarget {
    paths: SystemPaths,
}

impl AptTarget {
    /// Create the adapter over the given path table.
    pub fn new(paths: SystemPaths) -> Self {
        Self { paths }
    }
}

/// Render the full fragment content, one directive per entry.
fn render_fragment(config: &ProxyConfig) -> String {
    let lines: Vec<String> = config
        .entries
        .iter()
        .map(|entry| {
            format!(
                "Acquire::{}::proxy \"{}\";",
                entry.protocol,
                config.proxy_url(entry)
            )
        })
        .collect();
    format!("\n{}\n", lines.join("\n"))
}

impl ProxyTarget for AptTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Apt
    }

    fn detect(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for path in [&self.paths.apt_conf, &self.paths.apt_fragment] {
            if textfile::contains_any_phrase(path, PHRASES)? {
                found.push(path.display().to_string());
            }
        }
        Ok(found)
    }

    fn apply(&self, config: &ProxyConfig) -> Result<()> {
        textfile::create_dir_if_missing(&self.paths.apt_conf_dir)?;
        std::fs::write(&self.paths.apt_fragment, render_fragment(config)).map_err(|e| {
            TargetError::Write {
                path: self.paths.apt_fragment.clone(),
                source: e,
            }
        })
    }

    fn remove(&self) -> Result<()> {
        // Only the main config is line-stripped; the fragment is ours and
        // goes away wholesale.
        if textfile::contains_any_phrase(&self.paths.apt_conf, PHRASES)? {
            textfile::remove_matching_lines(&self.paths.apt_conf, PHRASES)?;
        }
        textfile::remove_file_if_exists(&self.paths.apt_fragment)
    }
}
