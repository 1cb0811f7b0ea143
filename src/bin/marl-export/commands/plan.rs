//! `marl-export plan` command

use anyhow::Result;

use super::{build_options, config_for};
use crate::cli::PlanArgs;
use crate::GlobalOptions;
use marl_export::ops::plan;
use marl_export::util::context::GlobalContext;
use marl_export::util::fs::relative_path;

pub fn execute(args: PlanArgs, ctx: &GlobalContext, global_opts: &GlobalOptions) -> Result<()> {
    let config = config_for(ctx);
    let opts = build_options(&args.params, &config)?;

    let report = plan(ctx, &opts)?;

    if global_opts.shell.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let root = ctx.root();
    let build = &report.build;
    println!("parameters: {}", build.params);
    println!("generator:  {}", build.toolchain.generator);
    println!("configure:  {}", build.configure.display_command());
    println!("build:      {}", build.build.display_command());
    println!("artifact:   {}", build.info.artifact_path.display());

    for manifest in &report.exports {
        println!();
        println!("[{}]", manifest.scheme);
        for entry in &manifest.entries {
            println!(
                "  {} -> {}",
                relative_path(root, &entry.source).display(),
                relative_path(root, &entry.destination).display()
            );
        }
    }

    Ok(())
}
