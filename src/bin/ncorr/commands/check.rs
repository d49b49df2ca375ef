use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use nmr_correlate::build_state;
use nmr_correlate::io::read_rebuild;

use super::Outcome;
use crate::cli::CheckArgs;
use crate::config::build_correlation_config;
use crate::display::{Context as DisplayContext, Progress, print_state};
use crate::io::{display_name, open_input, stdin_is_tty};

const TOTAL_STEPS: u8 = 2;

pub fn run_check(args: CheckArgs, ctx: DisplayContext) -> Result<Outcome> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: ncorr check -i <CORRELATIONS> --formula <FORMULA>"
        );
    }

    let config = build_correlation_config(&args.correlation)?;
    let formula = config.formula();
    if formula.is_empty() {
        bail!("No target formula given; pass --formula or set `formula` in the options file");
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading correlations");
    let list = read_rebuild(open_input(args.io.input.as_deref())?)
        .context("Failed to read correlation table")?
        .correlations;
    let source = display_name(args.io.input.as_deref(), "stdin");
    progress.complete_step(
        "Reading correlations",
        &[format!("Parse {source} ({} correlations)", list.len()).as_str()],
    );

    progress.step("Computing diagnostics");
    let state = build_state(&list, &formula);
    let incomplete = state.values().filter(|s| !s.complete).count();
    let with_errors = state.values().filter(|s| s.has_errors()).count();
    progress.complete_step(
        "Computing diagnostics",
        &[
            format!("Target formula {formula}").as_str(),
            format!("{incomplete} incomplete, {with_errors} with errors").as_str(),
        ],
    );

    if ctx.interactive {
        print_state(&state);
    }

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &state).context("Failed to write diagnostics")?;
    writeln!(stdout).context("Failed to write diagnostics")?;

    progress.finish("Check complete");

    if incomplete > 0 || with_errors > 0 {
        Ok(Outcome::Issues)
    } else {
        Ok(Outcome::Clean)
    }
}
