use std::io::{self, BufRead, Write};

use clap::Args;
use rowing_core::{Config, DatasetMode, Pipeline, RunSummary, Unit};
use tracing::error;

use crate::Location;

#[derive(Args)]
pub struct RunArgs {
    /// Dataset selector (1-5)
    #[arg(short, long)]
    mode: DatasetMode,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(
    config: &Config,
    location: &Location,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = super::pipeline(config, location);
    let summary = pipeline.run(args.mode)?;
    let mut out = io::stdout().lock();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        print_summary(&mut out, &summary)?;
    }
    Ok(())
}

pub fn menu(config: &Config, location: &Location) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = super::pipeline(config, location);
    menu_loop(&pipeline, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

/// Interactive loop: one full run per valid selection until `x` or EOF.
/// A failed run is reported and the loop carries on.
pub fn menu_loop<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        writeln!(out, "There are various input files, from which you select one: ")?;
        for mode in DatasetMode::ALL {
            writeln!(out, "{}: {}", mode.selector(), mode.description())?;
        }
        writeln!(out, "x: exit")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let selection = line.trim();
        if selection.eq_ignore_ascii_case("x") {
            return Ok(());
        }

        let Ok(mode) = selection.parse::<DatasetMode>() else {
            writeln!(out, "Your selection was incorrect, try again")?;
            continue;
        };

        writeln!(out, "{}", pipeline.layout().input_path(mode).display())?;
        match pipeline.run(mode) {
            Ok(summary) => print_summary(&mut out, &summary)?,
            Err(e) => {
                error!(mode = %mode, error = %e, "run failed");
                writeln!(out, "error: {e}")?;
            }
        }

        writeln!(out, "\nPress Enter to continue...")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
    }
}

fn print_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "Distances (meters):")?;
    for record in summary.store.raw(Unit::Distance) {
        writeln!(out, "{record}, {}", Unit::Distance)?;
    }

    writeln!(out, "\nDurations (minutes):")?;
    for record in summary.store.raw(Unit::Duration) {
        writeln!(out, "{record}, {}", Unit::Duration)?;
    }

    if !summary.failures.is_empty() {
        writeln!(out, "\nSkipped {} line(s):", summary.failures.len())?;
        for failure in &summary.failures {
            writeln!(out, "  {failure}")?;
        }
    }
    writeln!(out, "\nChart: {}", summary.chart.path.display())?;
    if let Some(fit) = summary.chart.fit {
        writeln!(out, "Trend: {}", fit.formula_with_r_squared())?;
    }
    Ok(())
}
