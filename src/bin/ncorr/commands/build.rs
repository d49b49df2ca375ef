use std::io::Write;

use anyhow::{Context, Result, bail};

use nmr_correlate::io::{read_rebuild, read_snapshot, write_rebuild};
use nmr_correlate::{CorrelationConfig, Rebuild, SignalSnapshot, rebuild};

use crate::cli::BuildArgs;
use crate::config::build_correlation_config;
use crate::display::{
    Context as DisplayContext, Progress, print_correlations, print_snapshot_info, print_state,
};
use crate::io::{create_output, display_name, open_input, stdin_is_tty};

const TOTAL_STEPS: u8 = 3;

pub fn run_build(args: BuildArgs, ctx: DisplayContext) -> Result<()> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: ncorr build -i <SNAPSHOT> or pipe JSON via stdin."
        );
    }

    let config = build_correlation_config(&args.correlation)?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading signals");
    let snapshot = read_snapshot(open_input(args.io.input.as_deref())?)
        .context("Failed to read signal snapshot")?;
    let previous = read_previous(&args)?;

    let read_substeps = build_read_substeps(&args, &snapshot, &previous);
    let read_substeps_ref: Vec<&str> = read_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Reading signals", &read_substeps_ref);

    if ctx.interactive {
        print_snapshot_info(&snapshot);
    }

    progress.step("Rebuilding correlations");
    let result = rebuild(&snapshot, &previous, &config);

    let rebuild_substeps = build_rebuild_substeps(&config, &result);
    let rebuild_substeps_ref: Vec<&str> = rebuild_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Rebuilding correlations", &rebuild_substeps_ref);

    if ctx.interactive {
        print_correlations(&result.correlations);
        print_state(&result.state);
    }

    progress.step("Writing output");
    let mut output = create_output(args.output.as_deref())?;
    write_rebuild(&mut output, &result).context("Failed to write correlation table")?;
    output.flush().context("Failed to flush output")?;

    let target = display_name(args.output.as_deref(), "stdout");
    progress.complete_step("Writing output", &[format!("JSON → {target}").as_str()]);

    progress.finish("Rebuild complete");

    Ok(())
}

fn read_previous(args: &BuildArgs) -> Result<Rebuild> {
    let Some(path) = args.previous.as_deref() else {
        return Ok(Rebuild::default());
    };
    read_rebuild(open_input(Some(path))?)
        .with_context(|| format!("Failed to read previous correlations: {}", path.display()))
}

fn build_read_substeps(
    args: &BuildArgs,
    snapshot: &SignalSnapshot,
    previous: &Rebuild,
) -> Vec<String> {
    let source = display_name(args.io.input.as_deref(), "stdin");
    let count_1d: usize = snapshot.signals_1d.values().map(Vec::len).sum();
    let count_2d: usize = snapshot.signals_2d.values().map(Vec::len).sum();
    let count_editing: usize = snapshot.editing.values().map(Vec::len).sum();

    let mut steps = vec![format!(
        "Parse {source} ({count_1d} 1D, {count_2d} 2D, {count_editing} editing signals)"
    )];

    let carried = &previous.correlations;
    if carried.is_empty() {
        steps.push("Start from an empty table".to_string());
    } else {
        let edited = carried.iter().filter(|c| c.edited.any()).count();
        steps.push(format!(
            "Carry over {} correlations ({edited} with manual edits)",
            carried.len()
        ));
    }

    steps
}

fn build_rebuild_substeps(config: &CorrelationConfig, result: &Rebuild) -> Vec<String> {
    let formula = config.formula();
    let real = result
        .correlations
        .iter()
        .filter(|c| !c.is_pseudo())
        .count();
    let pseudo = result.correlations.len() - real;
    let links: usize = result.correlations.iter().map(|c| c.links.len()).sum();

    let mut steps = Vec::new();
    if formula.is_empty() {
        steps.push("No target formula (diagnostics skipped)".to_string());
    } else {
        steps.push(format!("Target formula {formula}"));
    }
    steps.push(format!("{real} real, {pseudo} placeholder correlations"));
    steps.push(format!("{links} resolved link halves"));
    steps
}
