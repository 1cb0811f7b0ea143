//! CMake build orchestration.
//!
//! Sequences: resolve → create build directory → configure → build. Either
//! both CMake steps succeed or the first failure is returned; there are no
//! retries.

use std::path::{Path, PathBuf};
use std::process::Output;

use serde::Serialize;

use crate::builder::events::{EventSink, PipelineEvent};
use crate::builder::layout::{locate, BuildInfo};
use crate::builder::toolchain::{ResolvedToolchain, ToolchainResolver};
use crate::core::{ParameterSet, PipelineError, PipelineResult};
use crate::util::context::ToolchainEnv;
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Default name of the CMake executable.
pub const CMAKE: &str = "cmake";

/// Everything a build would do, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub params: ParameterSet,
    pub toolchain: ResolvedToolchain,
    pub info: BuildInfo,
    pub configure: ProcessBuilder,
    pub build: ProcessBuilder,
}

/// CMake build orchestrator.
#[derive(Debug, Clone)]
pub struct CMakeBuilder<'a> {
    root: &'a Path,
    env: &'a ToolchainEnv,
    cmake: PathBuf,
    jobs: Option<usize>,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a builder for the repository at `root`.
    pub fn new(root: &'a Path, env: &'a ToolchainEnv) -> Self {
        CMakeBuilder {
            root,
            env,
            cmake: PathBuf::from(CMAKE),
            jobs: None,
        }
    }

    /// Use a specific CMake executable.
    pub fn cmake(mut self, cmake: impl Into<PathBuf>) -> Self {
        self.cmake = cmake.into();
        self
    }

    /// Number of parallel build jobs (`--parallel N`).
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Resolve the toolchain and artifact location and assemble both
    /// CMake invocations.
    pub fn plan(&self, params: &ParameterSet) -> PipelineResult<BuildPlan> {
        let toolchain = ToolchainResolver::new(self.root, self.env).resolve(params)?;
        let info = locate(params, self.root);

        let configure = ProcessBuilder::new(&self.cmake)
            .arg("-B")
            .arg(&info.build_directory)
            .arg("-S")
            .arg(self.root)
            .arg("-G")
            .arg(&toolchain.generator)
            .args(&toolchain.toolchain_args)
            .cwd(&info.build_directory);

        let mut build = ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(&info.build_directory)
            .arg("--config")
            .arg(&toolchain.build_config_label);
        if let Some(jobs) = self.jobs {
            build = build.arg("--parallel").arg(jobs.to_string());
        }

        Ok(BuildPlan {
            params: params.clone(),
            toolchain,
            info,
            configure,
            build,
        })
    }

    /// Configure and build.
    ///
    /// Nothing is created on disk and no process is spawned until resolution
    /// has succeeded and the CMake executable has been found.
    pub fn run(
        &self,
        params: &ParameterSet,
        runner: &mut dyn CommandRunner,
        events: &mut dyn EventSink,
    ) -> PipelineResult<BuildInfo> {
        let plan = self.plan(params)?;

        if runner.find_program(&self.cmake).is_none() {
            return Err(PipelineError::ToolNotFound {
                tool: self.cmake.display().to_string(),
            });
        }

        ensure_dir(&plan.info.build_directory)?;

        // Configure
        events.emit(PipelineEvent::ConfigureStarted {
            generator: plan.toolchain.generator.clone(),
            build_directory: plan.info.build_directory.clone(),
        });
        self.configure(&plan, runner)?;

        // Build
        events.emit(PipelineEvent::BuildStarted {
            config: plan.toolchain.build_config_label.clone(),
        });
        self.compile(&plan, runner)?;

        events.emit(PipelineEvent::BuildFinished {
            artifact: plan.info.artifact_path.clone(),
        });
        Ok(plan.info)
    }

    /// Run CMake configuration.
    fn configure(&self, plan: &BuildPlan, runner: &mut dyn CommandRunner) -> PipelineResult<()> {
        tracing::debug!("configuring {}", plan.params);
        tracing::debug!("{}", plan.configure.display_command());

        let output = runner
            .run(&plan.configure)
            .map_err(|e| PipelineError::ConfigureFailed {
                code: None,
                output: format!("{:#}", e),
            })?;

        if !output.status.success() {
            return Err(PipelineError::ConfigureFailed {
                code: output.status.code(),
                output: tool_output(&output),
            });
        }

        Ok(())
    }

    /// Run CMake build.
    fn compile(&self, plan: &BuildPlan, runner: &mut dyn CommandRunner) -> PipelineResult<()> {
        tracing::debug!("building ({})", plan.toolchain.build_config_label);
        tracing::debug!("{}", plan.build.display_command());

        let output = runner
            .run(&plan.build)
            .map_err(|e| PipelineError::BuildFailed {
                code: None,
                output: format!("{:#}", e),
            })?;

        if !output.status.success() {
            return Err(PipelineError::BuildFailed {
                code: output.status.code(),
                output: tool_output(&output),
            });
        }

        Ok(())
    }
}

/// Tool output for error reports: stdout followed by stderr.
///
/// Makefile generators report compile errors on stdout, so both are kept.
fn tool_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    [stdout.trim(), stderr.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}
