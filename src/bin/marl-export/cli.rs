//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

use marl_export::util::shell::ColorChoice;

/// marl-export - build the marl fiber library and export it for engine integration
#[derive(Parser)]
#[command(name = "marl-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color)]
    pub color: ColorChoice,

    /// Repository root (defaults to the nearest directory containing CMakeLists.txt)
    #[arg(long, global = true, env = "MARL_EXPORT_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_color(s: &str) -> Result<ColorChoice, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure, build and export the library
    Build(BuildArgs),

    /// Export an already-built library without running CMake
    Export(BuildArgs),

    /// Show what a build would do, without doing it
    Plan(PlanArgs),

    /// Remove build output
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Build parameters. Unset values fall back to config, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Target platform: windows, macos, android, ios
    #[arg(long, short = 'p')]
    pub platform: Option<String>,

    /// Target architecture: x86, x86_64, arm64-v8a, armeabi-v7a
    #[arg(long, short = 'a')]
    pub arch: Option<String>,

    /// Build configuration: debug, release
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Android API level (1 or higher)
    #[arg(
        long,
        env = "MARL_EXPORT_ANDROID_API_LEVEL",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub android_api_level: Option<u32>,

    /// Visual Studio major version (16 = 2019, 17 = 2022)
    #[arg(long, env = "MARL_EXPORT_VS_VERSION")]
    pub vs_version: Option<u32>,

    /// Skip the canonical export layout
    #[arg(long)]
    pub no_canonical: bool,

    /// Skip the alias export layout
    #[arg(long)]
    pub no_alias: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output format for pipeline events
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Only remove build/export
    #[arg(long)]
    pub export_only: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}
