//! Configuration file support for marl-export.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.marl-export/config.toml` - User-wide defaults
//! - Project: `.marl-export/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// marl-export configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default build parameters
    pub defaults: DefaultsConfig,

    /// Build tool settings
    pub build: BuildConfig,

    /// Export settings
    pub export: ExportConfig,
}

/// Default build parameters, used when the flag is not given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// windows, macos, android or ios
    pub platform: Option<String>,

    /// x86, x86_64, arm64-v8a or armeabi-v7a
    pub arch: Option<String>,

    /// debug or release
    pub config: Option<String>,

    pub android_api_level: Option<u32>,

    /// Visual Studio major version (16 or 17)
    pub vs_version: Option<u32>,
}

/// Build tool settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Path to the cmake executable (defaults to `cmake` on PATH)
    pub cmake: Option<PathBuf>,

    /// Parallel jobs for the build step (None = let CMake decide)
    pub jobs: Option<usize>,
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write build/export/libs, include and src
    #[serde(default = "default_true")]
    pub canonical: bool,

    /// Write build/export/gdcompatible_libs
    #[serde(default = "default_true")]
    pub alias: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            canonical: true,
            alias: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Raw layer as read from one file, where "absent" is distinguishable from "false".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    defaults: DefaultsConfig,
    build: BuildConfig,
    export: ExportLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ExportLayer {
    canonical: Option<bool>,
    alias: Option<bool>,
}

impl Config {
    /// Load configuration from a single file.
    #[cfg(test)]
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.merge_layer(Self::load_layer(path)?);
        Ok(config)
    }

    fn load_layer(path: &Path) -> Result<ConfigLayer> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Merge the file at `path` into this config, if it exists.
    ///
    /// A file that fails to load is reported and skipped.
    fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match Self::load_layer(path) {
            Ok(layer) => self.merge_layer(layer),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
            }
        }
    }

    /// Merge another layer into this one (other takes precedence).
    fn merge_layer(&mut self, other: ConfigLayer) {
        let ConfigLayer {
            defaults,
            build,
            export,
        } = other;

        // Defaults
        if defaults.platform.is_some() {
            self.defaults.platform = defaults.platform;
        }
        if defaults.arch.is_some() {
            self.defaults.arch = defaults.arch;
        }
        if defaults.config.is_some() {
            self.defaults.config = defaults.config;
        }
        if defaults.android_api_level.is_some() {
            self.defaults.android_api_level = defaults.android_api_level;
        }
        if defaults.vs_version.is_some() {
            self.defaults.vs_version = defaults.vs_version;
        }

        // Build settings
        if build.cmake.is_some() {
            self.build.cmake = build.cmake;
        }
        if build.jobs.is_some() {
            self.build.jobs = build.jobs;
        }

        // Export settings
        if let Some(canonical) = export.canonical {
            self.export.canonical = canonical;
        }
        if let Some(alias) = export.alias {
            self.export.alias = alias;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.marl-export/config.toml)
/// 2. Global config (~/.marl-export/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge_file(global_path);
    }

    // Project config overrides global
    config.merge_file(project_path);

    config
}
