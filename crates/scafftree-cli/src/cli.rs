use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ScaffTree CLI - Generates scaffold trees from molecule collections by iterative ring pruning of Murcko scaffolds.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a scaffold tree from a molecule list and write it as JSON.
    Generate(GenerateArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the input molecule list (.smi or .csv with id/smiles columns).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output scaffold tree JSON file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Title of the generated tree. Defaults to the input file stem.
    #[arg(short, long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Free-form comment stored with the tree.
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,

    /// Path to a custom prioritization ruleset in TOML format.
    /// Without it the built-in rule order is used.
    #[arg(short, long, value_name = "PATH")]
    pub ruleset: Option<PathBuf>,

    /// Remove terminal sugar rings before scaffold construction.
    #[arg(long)]
    pub deglycosilate: bool,

    /// Name recorded as the initiator of the run.
    #[arg(long, value_name = "NAME")]
    pub initiator: Option<String>,
}
