//! Shell-profile target: `export` lines in bash and POSIX profile files.
//!
//! Bash reads different startup files depending on how it is invoked
//! (login shell, interactive non-login, non-interactive). The proxy block
//! is written to every relevant file, and `BASH_ENV` is pointed at one of
//! them so non-interactive shells pick the variables up too.

use std::path::PathBuf;

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::paths::SystemPaths;
use crate::textfile;

use super::{ProxyTarget, TargetKind};

/// Phrases identifying proxy assignments in shell files.
const PHRASES: &[&str] = &["_proxy=", "_PROXY="];

/// Adapter for the bash/POSIX profile family.
pub struct ShellProfileTarget {
    paths: SystemPaths,
}

impl ShellProfileTarget {
    /// Create the adapter over the given path table.
    pub fn new(paths: SystemPaths) -> Self {
        Self { paths }
    }

    /// Files checked for proxy content, in reporting order.
    fn checked_files(&self) -> [&PathBuf; 8] {
        [
            &self.paths.bash_profile,
            &self.paths.bash_login,
            &self.paths.user_profile,
            &self.paths.bash_env,
            &self.paths.bash_bashrc,
            &self.paths.bashrc,
            &self.paths.profile_fragment,
            &self.paths.profile,
        ]
    }

    /// The login profile bash actually reads: the first of `.bash_profile`,
    /// `.bash_login`, `.profile` that exists, else `.bash_profile` (which
    /// the write then creates).
    fn superior_file(&self) -> &PathBuf {
        let candidates = [
            &self.paths.bash_profile,
            &self.paths.bash_login,
            &self.paths.user_profile,
        ];
        candidates
            .into_iter()
            .find(|path| path.exists())
            .unwrap_or(&self.paths.bash_profile)
    }

    /// Snippet making `profile` source every `*.sh` under `profile.d`.
    fn sourcing_snippet(&self) -> String {
        let dir = self.paths.profile_dir.display();
        [
            format!("if [ -d {} ]; then", dir),
            format!("  for i in {}/*.sh; do", dir),
            "    if [ -r $i ]; then".to_string(),
            "      . $i".to_string(),
            "    fi".to_string(),
            "  done".to_string(),
            "  unset i".to_string(),
            "fi".to_string(),
        ]
        .join("\n")
    }
}

/// Render the export block written to every shell file.
fn render_exports(config: &ProxyConfig) -> String {
    let mut lines = Vec::new();
    for entry in &config.entries {
        let url = config.proxy_url(entry);
        lines.push(format!("export {}_proxy=\"{}\"", entry.protocol, url));
        lines.push(format!(
            "export {}_PROXY=\"{}\"",
            entry.protocol.to_uppercase(),
            url
        ));
    }
    if let Some(list) = config.bypass_list() {
        lines.push(format!("export no_proxy=\"{}\"", list));
        lines.push(format!("export NO_PROXY=\"{}\"", list));
    }
    lines.join("\n")
}

impl ProxyTarget for ShellProfileTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::ShellProfile
    }

    fn detect(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for path in self.checked_files() {
            if textfile::contains_any_phrase(path, PHRASES)? {
                found.push(path.display().to_string());
            }
        }
        Ok(found)
    }

    fn apply(&self, config: &ProxyConfig) -> Result<()> {
        // The fragment only takes effect if profile sources profile.d.
        let marker = format!("{}/*.sh", self.paths.profile_dir.display());
        textfile::ensure_block(
            &self.paths.profile,
            |line| line.contains(&marker),
            &self.sourcing_snippet(),
        )?;
        textfile::create_dir_if_missing(&self.paths.profile_dir)?;

        let block = render_exports(config);
        let bash_env_line = format!("export BASH_ENV=\"{}\"", self.paths.bash_env.display());
        let files = [
            &self.paths.profile_fragment,
            self.superior_file(),
            &self.paths.bash_bashrc,
            &self.paths.bashrc,
            &self.paths.bash_env,
        ];
        for path in files {
            // Every file except ~/.bash_env itself references it.
            if path != &self.paths.bash_env {
                textfile::ensure_block(path, |line| line.contains("BASH_ENV"), &bash_env_line)?;
            }
            textfile::append_block(path, &block)?;
        }
        tracing::debug!("Wrote proxy exports to {} shell files", files.len());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        for path in self.checked_files() {
            if textfile::contains_any_phrase(path, PHRASES)? {
                textfile::remove_matching_lines(path, PHRASES)?;
            }
        }
        textfile::remove_file_if_exists(&self.paths.profile_fragment)
    }
}
