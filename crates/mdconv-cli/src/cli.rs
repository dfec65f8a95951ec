use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "mdconv - Richardson-extrapolation convergence study of molecular-dynamics step-size sweeps.",
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

    /// Process sweep groups in parallel on this many threads.
    /// Without this flag groups are processed one after another.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract every run of a sweep and print the convergence tables of each group.
    Report(ReportArgs),
    /// List the force fields, tolerances and step sizes found under a sweep root.
    Scan(ScanArgs),
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Root directory of the sweep (one subdirectory per force field).
    #[arg(required = true, value_name = "ROOT")]
    pub root: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output file for the report. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Richardson Overrides ---
    /// Atom (index within the selection) and axis to study, e.g. '0:x'.
    /// Can be used multiple times; each probe gets its own table.
    #[arg(short = 'p', long = "probe", value_name = "ATOM:AXIS")]
    pub probes: Vec<String>,

    /// Override the assumed convergence order of the integrator.
    #[arg(long, value_name = "INT")]
    pub order: Option<u32>,

    /// Override the refinement ratio between successive step sizes.
    #[arg(long, value_name = "FLOAT")]
    pub ratio: Option<f64>,

    /// Also run the Richardson diagnostic on one energy component ('kinetic' or 'potential').
    #[arg(short = 'e', long, value_name = "COMPONENT")]
    pub energy_component: Option<String>,

    // --- Selection Overrides ---
    /// Study every atom of the structure instead of the protein atoms only.
    #[arg(long)]
    pub all_atoms: bool,

    // --- Output Overrides ---
    /// Output format: 'text' or 'csv'.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Report a group whose runs cannot be read as failed and keep going,
    /// instead of aborting the whole sweep.
    #[arg(long)]
    pub skip_failed_groups: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S richardson.order=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory of the sweep.
    #[arg(required = true, value_name = "ROOT")]
    pub root: PathBuf,

    /// Optional configuration file; only its `[layout]` section is used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
