//! Implementation of `marl-export build` and `marl-export export`.

use std::path::PathBuf;
use std::time::Instant;

use crate::builder::cmake::{is_cmake_project, CMakeBuilder, CMAKE};
use crate::builder::events::{EventSink, PipelineEvent};
use crate::builder::layout::{locate, BuildInfo};
use crate::core::{ParameterSet, PipelineResult};
use crate::export::{alias, canonical, ExportManifest};
use crate::util::context::GlobalContext;
use crate::util::process::CommandRunner;

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub params: ParameterSet,

    /// CMake executable (defaults to `cmake` on PATH)
    pub cmake: Option<PathBuf>,

    /// Parallel jobs for the build step
    pub jobs: Option<usize>,

    /// Skip configure/build and export an existing artifact
    pub skip_build: bool,

    /// Write the canonical export layout
    pub canonical: bool,

    /// Write the alias export layout
    pub alias: bool,
}

impl BuildOptions {
    /// Full pipeline with both export schemes.
    pub fn new(params: ParameterSet) -> Self {
        BuildOptions {
            params,
            cmake: None,
            jobs: None,
            skip_build: false,
            canonical: true,
            alias: true,
        }
    }

    pub(crate) fn builder<'a>(&self, ctx: &'a GlobalContext) -> CMakeBuilder<'a> {
        CMakeBuilder::new(ctx.root(), ctx.env())
            .cmake(self.cmake.clone().unwrap_or_else(|| PathBuf::from(CMAKE)))
            .jobs(self.jobs)
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub info: BuildInfo,
    pub manifests: Vec<ExportManifest>,
}

impl BuildResult {
    /// Total number of export entries written.
    pub fn exported(&self) -> usize {
        self.manifests.iter().map(ExportManifest::len).sum()
    }
}

/// Log a warning for parameter combinations that are accepted but unusual.
pub(crate) fn warn_unusual(ctx: &GlobalContext, params: &ParameterSet) {
    if !params.is_conventional_pairing() {
        tracing::warn!(
            "architecture `{}` is unusual for platform `{}`; building anyway",
            params.arch,
            params.platform
        );
    }
    if !is_cmake_project(ctx.root()) {
        tracing::warn!("no CMakeLists.txt found in {}", ctx.root().display());
    }
}

/// Report every entry of an applied manifest.
fn emit_exported(events: &mut dyn EventSink, manifest: &ExportManifest) {
    for entry in &manifest.entries {
        events.emit(PipelineEvent::Exported {
            scheme: manifest.scheme.to_string(),
            destination: entry.destination.clone(),
        });
    }
}

/// Run the pipeline: build (unless skipped), verify, then export.
///
/// The first failure aborts everything after it.
pub fn build(
    ctx: &GlobalContext,
    opts: &BuildOptions,
    runner: &mut dyn CommandRunner,
    events: &mut dyn EventSink,
) -> PipelineResult<BuildResult> {
    let started = Instant::now();
    let params = &opts.params;
    warn_unusual(ctx, params);

    let info = if opts.skip_build {
        locate(params, ctx.root())
    } else {
        opts.builder(ctx).run(params, runner, events)?
    };
    info.verify_artifact()?;

    let mut manifests = Vec::new();
    if opts.canonical {
        let manifest = canonical::export(&info, params)?;
        emit_exported(events, &manifest);
        manifests.push(manifest);
    }
    if opts.alias {
        let manifest = alias::export(&info, params)?;
        emit_exported(events, &manifest);
        manifests.push(manifest);
    }

    let result = BuildResult { info, manifests };
    events.emit(PipelineEvent::PipelineFinished {
        exported: result.exported(),
        duration_ms: started.elapsed().as_millis() as u64,
    });

    Ok(result)
}
