//! Implementation of `marl-export plan`.
//!
//! Computes everything a build would do without touching the filesystem or
//! spawning a process.

use serde::Serialize;

use crate::builder::cmake::BuildPlan;
use crate::core::PipelineResult;
use crate::export::{alias, canonical, ExportManifest};
use crate::ops::marl_build::{warn_unusual, BuildOptions};
use crate::util::context::GlobalContext;

/// A build plan together with the exports that would follow it.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub build: BuildPlan,
    pub exports: Vec<ExportManifest>,
}

/// Resolve the build and export plan for `opts`.
pub fn plan(ctx: &GlobalContext, opts: &BuildOptions) -> PipelineResult<PlanReport> {
    warn_unusual(ctx, &opts.params);

    let build = opts.builder(ctx).plan(&opts.params)?;

    let mut exports = Vec::new();
    if opts.canonical {
        exports.push(canonical::plan(&build.info, &opts.params));
    }
    if opts.alias {
        exports.push(alias::plan(&build.info, &opts.params));
    }

    Ok(PlanReport { build, exports })
}
