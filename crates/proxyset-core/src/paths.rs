//! Locations of the configuration files the targets edit.

use std::path::{Path, PathBuf};

/// Every file path the target adapters touch.
///
/// Production code builds this from the live system via [`SystemPaths::from_env`];
/// tests point it at a scratch directory via [`SystemPaths::rooted`].
#[derive(Debug, Clone)]
pub struct SystemPaths {
    /// PAM login environment (`/etc/environment`).
    pub environment: PathBuf,
    /// System-wide bashrc (`/etc/bash.bashrc`).
    pub bash_bashrc: PathBuf,
    /// Main APT configuration (`/etc/apt/apt.conf`).
    pub apt_conf: PathBuf,
    /// APT configuration fragment directory (`/etc/apt/apt.conf.d`).
    pub apt_conf_dir: PathBuf,
    /// The APT fragment this tool owns (`/etc/apt/apt.conf.d/99proxy`).
    pub apt_fragment: PathBuf,
    /// Main sudoers file (`/etc/sudoers`).
    pub sudoers: PathBuf,
    /// Sudoers fragment directory (`/etc/sudoers.d`).
    pub sudoers_dir: PathBuf,
    /// The sudoers fragment this tool owns (`/etc/sudoers.d/proxy`).
    pub sudoers_fragment: PathBuf,
    /// System-wide login profile (`/etc/profile`).
    pub profile: PathBuf,
    /// Profile fragment directory (`/etc/profile.d`).
    pub profile_dir: PathBuf,
    /// The profile fragment this tool owns (`/etc/profile.d/proxy.sh`).
    pub profile_fragment: PathBuf,
    /// Per-user bashrc (`~/.bashrc`).
    pub bashrc: PathBuf,
    /// Per-user login profile (`~/.bash_profile`).
    pub bash_profile: PathBuf,
    /// Per-user login profile, second in bash's lookup order (`~/.bash_login`).
    pub bash_login: PathBuf,
    /// Per-user POSIX profile (`~/.profile`).
    pub user_profile: PathBuf,
    /// Environment file for non-interactive bash (`~/.bash_env`).
    pub bash_env: PathBuf,
}

impl SystemPaths {
    /// Build the path table from explicit `/etc` and home directories.
    pub fn new(etc_dir: &Path, home_dir: &Path) -> Self {
        let apt_conf_dir = etc_dir.join("apt/apt.conf.d");
        let sudoers_dir = etc_dir.join("sudoers.d");
        let profile_dir = etc_dir.join("profile.d");

        Self {
            environment: etc_dir.join("environment"),
            bash_bashrc: etc_dir.join("bash.bashrc"),
            apt_conf: etc_dir.join("apt/apt.conf"),
            apt_fragment: apt_conf_dir.join("99proxy"),
            apt_conf_dir,
            sudoers: etc_dir.join("sudoers"),
            sudoers_fragment: sudoers_dir.join("proxy"),
            sudoers_dir,
            profile: etc_dir.join("profile"),
            profile_fragment: profile_dir.join("proxy.sh"),
            profile_dir,
            bashrc: home_dir.join(".bashrc"),
            bash_profile: home_dir.join(".bash_profile"),
            bash_login: home_dir.join(".bash_login"),
            user_profile: home_dir.join(".profile"),
            bash_env: home_dir.join(".bash_env"),
        }
    }

    /// Paths for the running system.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn from_env() -> Option<Self> {
        let home = std::env::var_os("HOME")?;
        if home.is_empty() {
            return None;
        }
        Some(Self::new(Path::new("/etc"), Path::new(&home)))
    }

    /// Paths rooted under a scratch directory (`<root>/etc`, `<root>/home`).
    pub fn rooted(root: &Path) -> Self {
        Self::new(&root.join("etc"), &root.join("home"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== SystemPaths Tests ====================

    #[test]
    fn test_production_paths() {
        let paths = SystemPaths::new(Path::new("/etc"), Path::new("/home/user"));
        assert_eq!(paths.environment, PathBuf::from("/etc/environment"));
        assert_eq!(paths.apt_fragment, PathBuf::from("/etc/apt/apt.conf.d/99proxy"));
        assert_eq!(paths.sudoers_fragment, PathBuf::from("/etc/sudoers.d/proxy"));
        assert_eq!(paths.profile_fragment, PathBuf::from("/etc/profile.d/proxy.sh"));
        assert_eq!(paths.bashrc, PathBuf::from("/home/user/.bashrc"));
        assert_eq!(paths.bash_env, PathBuf::from("/home/user/.bash_env"));
    }

    #[test]
    fn test_rooted_paths_stay_under_root() {
        let root = PathBuf::from("/tmp/scratch");
        let paths = SystemPaths::rooted(&root);
        assert!(paths.sudoers.starts_with(&root));
        assert!(paths.bash_profile.starts_with(&root));
        assert_eq!(paths.bash_bashrc, root.join("etc/bash.bashrc"));
    }
}
