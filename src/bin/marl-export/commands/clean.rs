//! `marl-export clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::GlobalOptions;
use marl_export::ops::clean;
use marl_export::util::context::GlobalContext;
use marl_export::util::shell::Status;

pub fn execute(args: CleanArgs, ctx: &GlobalContext, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    match clean(ctx, args.export_only)? {
        Some(dir) => shell.status(Status::Removed, dir.display()),
        None => shell.status(Status::Info, "nothing to clean"),
    }

    Ok(())
}
