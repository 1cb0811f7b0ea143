//! Global context for marl-export operations.
//!
//! Provides centralized access to the repository root, configuration paths,
//! and the snapshot of environment values the toolchain resolver needs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::util::fs::absolute_path;

/// Environment variable naming the Android NDK root.
pub const ANDROID_NDK_ROOT: &str = "ANDROID_NDK_ROOT";

/// File that marks the repository root.
pub const ROOT_MARKER: &str = "CMakeLists.txt";

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".marl-export";

/// Environment values read once at start-up.
///
/// The resolver never touches the process environment itself; it only sees
/// what was captured here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    pub android_ndk_root: Option<PathBuf>,
}

impl ToolchainEnv {
    /// Capture the relevant variables from the current process.
    pub fn from_process() -> Self {
        ToolchainEnv {
            android_ndk_root: std::env::var_os(ANDROID_NDK_ROOT)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Set the NDK root explicitly.
    pub fn with_android_ndk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.android_ndk_root = Some(root.into());
        self
    }
}

/// Per-invocation context.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    root: PathBuf,
    home_config_dir: Option<PathBuf>,
    env: ToolchainEnv,
}

impl GlobalContext {
    /// Create a context rooted at `root`, or discover the root from the
    /// current directory when none is given.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => {
                let cwd = std::env::current_dir().context("failed to get current directory")?;
                find_project_root(&cwd).unwrap_or(cwd)
            }
        };

        Ok(GlobalContext {
            root: absolute_path(&root)?,
            home_config_dir: BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME)),
            env: ToolchainEnv::from_process(),
        })
    }

    /// Create a context with explicit values (for tests and embedding).
    pub fn with_parts(root: PathBuf, env: ToolchainEnv) -> Self {
        GlobalContext {
            root,
            home_config_dir: None,
            env,
        }
    }

    /// Absolute repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Captured environment.
    pub fn env(&self) -> &ToolchainEnv {
        &self.env
    }

    /// Global config file (`~/.marl-export/config.toml`), if a home directory exists.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.home_config_dir.as_ref().map(|d| d.join("config.toml"))
    }

    /// Project config file (`<root>/.marl-export/config.toml`).
    pub fn project_config_path(&self) -> PathBuf {
        self.root.join(CONFIG_DIR_NAME).join("config.toml")
    }

    /// `<root>/build`
    pub fn build_root(&self) -> PathBuf {
        self.root.join("build")
    }

    /// `<root>/build/export`
    pub fn export_root(&self) -> PathBuf {
        self.build_root().join("export")
    }
}

/// Walk up from `start` to the first directory containing [`ROOT_MARKER`].
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_file())
        .map(Path::to_path_buf)
}
