//! `marl-export build` and `marl-export export` commands

use std::path::Path;

use anyhow::Result;

use super::{build_options, config_for};
use crate::cli::BuildArgs;
use crate::GlobalOptions;
use marl_export::builder::events::{EventSink, PipelineEvent};
use marl_export::ops::build;
use marl_export::util::context::GlobalContext;
use marl_export::util::fs::relative_path;
use marl_export::util::process::SystemRunner;
use marl_export::util::shell::{Shell, Spinner, Status};

pub fn execute(
    args: BuildArgs,
    ctx: &GlobalContext,
    global_opts: &GlobalOptions,
    skip_build: bool,
) -> Result<()> {
    let config = config_for(ctx);

    let mut opts = build_options(&args.params, &config)?;
    // Jobs: CLI > config > None (let CMake decide)
    opts.jobs = args.jobs.or(opts.jobs);
    opts.skip_build = skip_build;

    let mut sink = ShellSink::new(&global_opts.shell, ctx.root());
    let result = build(ctx, &opts, &mut SystemRunner, &mut sink)?;

    tracing::debug!(
        "artifact {} exported {} times",
        result.info.artifact_path.display(),
        result.exported()
    );
    Ok(())
}

/// Renders pipeline events through the shell.
struct ShellSink<'a> {
    shell: &'a Shell,
    root: &'a Path,
    spinner: Option<Spinner>,
}

impl<'a> ShellSink<'a> {
    fn new(shell: &'a Shell, root: &'a Path) -> Self {
        ShellSink {
            shell,
            root,
            spinner: None,
        }
    }

    fn display(&self, path: &Path) -> String {
        relative_path(self.root, path).display().to_string()
    }
}

impl EventSink for ShellSink<'_> {
    fn emit(&mut self, event: PipelineEvent) {
        if self.shell.is_json() {
            self.shell.json_event(&event);
            return;
        }

        match &event {
            PipelineEvent::ConfigureStarted {
                generator,
                build_directory,
            } => {
                let msg = format!("{} ({})", self.display(build_directory), generator);
                self.spinner = Some(self.shell.spinner(Status::Configuring, msg));
            }
            PipelineEvent::BuildStarted { config } => {
                // Finish the configure line before starting the next one
                self.spinner = None;
                self.spinner = Some(self.shell.spinner(Status::Building, config));
            }
            PipelineEvent::BuildFinished { artifact } => {
                self.spinner = None;
                tracing::debug!("built {}", artifact.display());
            }
            PipelineEvent::Exported {
                scheme,
                destination,
            } => {
                self.shell.status(
                    Status::Exported,
                    format!("{} [{}]", self.display(destination), scheme),
                );
            }
            PipelineEvent::PipelineFinished {
                exported,
                duration_ms,
            } => {
                self.shell.status(
                    Status::Finished,
                    format!(
                        "{} export(s) in {:.2}s",
                        exported,
                        *duration_ms as f64 / 1000.0
                    ),
                );
            }
        }
    }
}
