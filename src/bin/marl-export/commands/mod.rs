//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod plan;

use marl_export::core::{Architecture, Configuration, ParameterSet, PipelineResult, Platform};
use marl_export::core::params::{
    validate_android_api_level, DEFAULT_ANDROID_API_LEVEL, DEFAULT_VS_VERSION,
};
use marl_export::ops::BuildOptions;
use marl_export::util::config::{load_config, Config};
use marl_export::util::context::GlobalContext;

use crate::cli::ParamArgs;

/// Load global and project configuration for `ctx`.
pub fn config_for(ctx: &GlobalContext) -> Config {
    load_config(
        ctx.global_config_path().as_deref(),
        &ctx.project_config_path(),
    )
}

/// Merge CLI parameters with configuration: CLI > config > defaults.
pub fn build_options(args: &ParamArgs, config: &Config) -> PipelineResult<BuildOptions> {
    let defaults = &config.defaults;

    let platform = match args.platform.as_ref().or(defaults.platform.as_ref()) {
        Some(s) => s.parse()?,
        None => Platform::default(),
    };
    let arch = match args.arch.as_ref().or(defaults.arch.as_ref()) {
        Some(s) => s.parse()?,
        None => Architecture::default(),
    };
    let config_kind = match args.config.as_ref().or(defaults.config.as_ref()) {
        Some(s) => s.parse()?,
        None => Configuration::default(),
    };

    // The flag is range-checked by clap; the config value is not.
    let android_api_level = validate_android_api_level(
        args.android_api_level
            .or(defaults.android_api_level)
            .unwrap_or(DEFAULT_ANDROID_API_LEVEL),
    )?;

    let params = ParameterSet::new(platform, arch, config_kind)
        .with_android_api_level(android_api_level)
        .with_vs_version(
            args.vs_version
                .or(defaults.vs_version)
                .unwrap_or(DEFAULT_VS_VERSION),
        );

    let mut opts = BuildOptions::new(params);
    opts.cmake = config.build.cmake.clone();
    opts.jobs = config.build.jobs;
    opts.canonical = config.export.canonical && !args.no_canonical;
    opts.alias = config.export.alias && !args.no_alias;
    Ok(opts)
}
