use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use nmr_correlate::Element;

#[derive(Parser)]
#[command(
    name = "ncorr",
    about = "NMR signal correlation and assignment bookkeeping",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rebuild the correlation table from a signal snapshot
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Recompute diagnostics for an existing correlation table
    #[command(visible_alias = "c")]
    Check(CheckArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Build(args) => args.io.quiet,
            Command::Check(args) => args.io.quiet,
        }
    }

    pub fn verbose(&self) -> u8 {
        match self {
            Command::Build(args) => args.io.verbose,
            Command::Check(args) => args.io.verbose,
        }
    }
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Input JSON file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Suppress progress output and tables (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Target molecule and matching options.
#[derive(Args)]
#[command(next_help_heading = "Correlation Options")]
pub struct CorrelationOptions {
    /// Options file (TOML with `formula` and a `[tolerance]` table)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target molecular formula, e.g. C2H6 (overrides the options file)
    #[arg(short, long, value_name = "FORMULA")]
    pub formula: Option<String>,

    /// Shift tolerance for one atom type in ppm, repeatable (e.g. C=0.25)
    #[arg(
        short,
        long = "tolerance",
        value_name = "ATOM=PPM",
        action = clap::ArgAction::Append
    )]
    pub tolerances: Vec<ToleranceOverride>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub io: IoOptions,

    /// Output file for the rebuilt table (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Correlations from the previous rebuild, to carry manual edits over
    #[arg(short, long, value_name = "FILE")]
    pub previous: Option<PathBuf>,

    #[command(flatten)]
    pub correlation: CorrelationOptions,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub correlation: CorrelationOptions,
}

/// `ATOM=PPM` pair given on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToleranceOverride {
    pub atom_type: Element,
    pub value: f64,
}

impl FromStr for ToleranceOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (atom, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ATOM=PPM, got '{s}'"))?;
        let atom_type = atom
            .trim()
            .parse::<Element>()
            .map_err(|e| e.to_string())?;
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid tolerance value: '{}'", value.trim()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("tolerance must be non-negative, got {value}"));
        }
        Ok(Self { atom_type, value })
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
