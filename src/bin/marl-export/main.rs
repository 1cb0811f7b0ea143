//! marl-export CLI - builds marl and exports it for engine integration

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use marl_export::core::PipelineError;
use marl_export::util::context::GlobalContext;
use marl_export::util::Shell;

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("marl_export=debug")
    } else if cli.quiet {
        EnvFilter::new("marl_export=error")
    } else {
        EnvFilter::new("marl_export=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = match &cli.command {
        Commands::Build(args) | Commands::Export(args) => {
            args.message_format == MessageFormat::Json
        }
        Commands::Plan(args) => args.json,
        _ => false,
    };

    let global_opts = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.color, json),
    };

    if let Err(e) = run(cli, &global_opts) {
        let shell = &global_opts.shell;
        let pipeline = e.downcast_ref::<PipelineError>();

        shell.error(format!("{:#}", e));
        if let Some(hint) = pipeline.and_then(PipelineError::hint) {
            if !shell.is_json() {
                eprintln!("{}", hint);
            }
        }

        let code = pipeline
            .and_then(PipelineError::tool_exit_code)
            .filter(|code| *code != 0)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli, global_opts: &GlobalOptions) -> Result<()> {
    let root = cli.root;

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &context(root)?, global_opts, false),
        Commands::Export(args) => commands::build::execute(args, &context(root)?, global_opts, true),
        Commands::Plan(args) => commands::plan::execute(args, &context(root)?, global_opts),
        Commands::Clean(args) => commands::clean::execute(args, &context(root)?, global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn context(root: Option<PathBuf>) -> Result<GlobalContext> {
    let ctx = GlobalContext::new(root)?;
    tracing::debug!("repository root: {}", ctx.root().display());
    Ok(ctx)
}
