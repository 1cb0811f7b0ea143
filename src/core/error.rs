//! Pipeline error taxonomy.
//!
//! Every stage aborts on the first error; nothing is retried.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::fs::FsError;

/// `ExportIo` op for a library missing after the build step.
pub const FIND_BUILT_ARTIFACT: &str = "find built artifact";

/// `ExportIo` op for a header or source tree missing before export.
pub const FIND_EXPORT_SOURCE: &str = "find export source";

/// Error raised by any pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported platform `{value}` (expected one of: windows, macos, android, ios)")]
    UnsupportedPlatform { value: String },

    #[error(
        "unsupported architecture `{value}` (expected one of: x86, x86_64, arm64-v8a, armeabi-v7a)"
    )]
    UnsupportedArchitecture { value: String },

    #[error("unsupported configuration `{value}` (expected one of: debug, release)")]
    UnsupportedConfiguration { value: String },

    #[error("unsupported Android API level `{value}` (expected a positive integer)")]
    UnsupportedAndroidApiLevel { value: u32 },

    #[error("environment variable `{var}` is not set")]
    MissingEnvironment { var: String },

    #[error("`{tool}` not found")]
    ToolNotFound { tool: String },

    #[error("CMake configuration failed (exit code {code:?}):\n{output}")]
    ConfigureFailed { code: Option<i32>, output: String },

    #[error("CMake build failed (exit code {code:?}):\n{output}")]
    BuildFailed { code: Option<i32>, output: String },

    #[error("export failed: could not {op} {}", path.display())]
    ExportIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<FsError> for PipelineError {
    fn from(err: FsError) -> Self {
        PipelineError::Io {
            op: err.op,
            path: err.path,
            source: err.source,
        }
    }
}

/// Result alias for pipeline stages.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Classify a filesystem failure as an export failure.
    pub fn export(err: FsError) -> Self {
        PipelineError::ExportIo {
            op: err.op,
            path: err.path,
            source: err.source,
        }
    }

    /// Exit code of the external tool, if this error came from one.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            PipelineError::ConfigureFailed { code, .. } | PipelineError::BuildFailed { code, .. } => {
                *code
            }
            _ => None,
        }
    }

    /// A short actionable suggestion for the user.
    pub fn hint(&self) -> Option<String> {
        match self {
            PipelineError::UnsupportedPlatform { .. }
            | PipelineError::UnsupportedArchitecture { .. }
            | PipelineError::UnsupportedConfiguration { .. }
            | PipelineError::UnsupportedAndroidApiLevel { .. } => {
                Some("help: Run `marl-export build --help` to see accepted values".to_string())
            }
            PipelineError::MissingEnvironment { var } => Some(format!(
                "help: Set `{}` to the root of your installed toolchain",
                var
            )),
            PipelineError::ToolNotFound { tool } => Some(format!(
                "help: Install {} and ensure it's in your PATH, or set `[build] cmake` in .marl-export/config.toml",
                tool
            )),
            PipelineError::ConfigureFailed { .. } | PipelineError::BuildFailed { .. } => {
                Some("help: Re-run with `--verbose` for the full tool invocation".to_string())
            }
            PipelineError::ExportIo { op, .. } => Some(
                match *op {
                    FIND_BUILT_ARTIFACT => {
                        "help: The build tool did not place the artifact where expected; check the generator's output layout"
                    }
                    FIND_EXPORT_SOURCE => {
                        "help: Run marl-export from a complete marl checkout, or pass `--root`"
                    }
                    "copy missing file" | "read" => {
                        "help: An export source changed while it was being copied; re-run the command"
                    }
                    _ => "help: Check that build/export is writable and that nothing occupies the destination path",
                }
                .to_string(),
            ),
            PipelineError::Io { .. } => None,
        }
    }
}
