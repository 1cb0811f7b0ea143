//! Build parameters.
//!
//! A [`ParameterSet`] is built once from CLI/config input and is immutable
//! afterwards. The three enumerations are closed: anything outside them is
//! rejected at parse time, which makes every later resolution step total.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::PipelineError;

/// Default Android API level.
pub const DEFAULT_ANDROID_API_LEVEL: u32 = 24;

/// Default Visual Studio major version.
pub const DEFAULT_VS_VERSION: u32 = 17;

/// Check an Android API level: only positive levels exist.
pub fn validate_android_api_level(level: u32) -> Result<u32, PipelineError> {
    if level == 0 {
        return Err(PipelineError::UnsupportedAndroidApiLevel { value: level });
    }
    Ok(level)
}

/// Target platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Windows,
    Macos,
    Android,
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Macos,
        Platform::Android,
        Platform::Ios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PipelineError::UnsupportedPlatform {
                value: s.to_string(),
            })
    }
}

/// CPU architecture, using Android ABI spelling for the ARM variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "x86")]
    X86,
    #[default]
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
}

impl Architecture {
    pub const ALL: [Architecture; 4] = [
        Architecture::X86,
        Architecture::X86_64,
        Architecture::Arm64V8a,
        Architecture::ArmeabiV7a,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::Arm64V8a => "arm64-v8a",
            Architecture::ArmeabiV7a => "armeabi-v7a",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Architecture::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| PipelineError::UnsupportedArchitecture {
                value: s.to_string(),
            })
    }
}

/// Optimization configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    #[default]
    Debug,
    Release,
}

impl Configuration {
    pub const ALL: [Configuration; 2] = [Configuration::Debug, Configuration::Release];

    /// Lowercase name, used for directory names and `CMAKE_BUILD_TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "debug",
            Configuration::Release => "release",
        }
    }

    /// Capitalized name, as multi-config generators spell it.
    pub fn label(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Configuration::Release)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Configuration {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Configuration::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PipelineError::UnsupportedConfiguration {
                value: s.to_string(),
            })
    }
}

/// The full set of build parameters for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    pub platform: Platform,
    pub arch: Architecture,
    pub config: Configuration,
    /// Only meaningful for Android.
    pub android_api_level: u32,
    /// Only meaningful for Windows.
    pub vs_version: u32,
}

impl ParameterSet {
    /// Create a parameter set with default API level and VS version.
    pub fn new(platform: Platform, arch: Architecture, config: Configuration) -> Self {
        ParameterSet {
            platform,
            arch,
            config,
            android_api_level: DEFAULT_ANDROID_API_LEVEL,
            vs_version: DEFAULT_VS_VERSION,
        }
    }

    /// Parse a parameter set from raw strings.
    pub fn parse(platform: &str, arch: &str, config: &str) -> Result<Self, PipelineError> {
        Ok(ParameterSet::new(
            platform.parse()?,
            arch.parse()?,
            config.parse()?,
        ))
    }

    pub fn with_android_api_level(mut self, level: u32) -> Self {
        self.android_api_level = level;
        self
    }

    pub fn with_vs_version(mut self, version: u32) -> Self {
        self.vs_version = version;
        self
    }

    /// Whether the architecture is one this platform normally targets.
    ///
    /// Unconventional pairs are still accepted; callers only warn about them.
    pub fn is_conventional_pairing(&self) -> bool {
        use Architecture::*;
        match self.platform {
            Platform::Windows => matches!(self.arch, X86 | X86_64),
            Platform::Macos => matches!(self.arch, X86_64 | Arm64V8a),
            Platform::Android => true,
            Platform::Ios => matches!(self.arch, X86_64 | Arm64V8a),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.platform, self.arch, self.config)
    }
}
