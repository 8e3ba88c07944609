use std::path::PathBuf;

use clap::Args;
use rowing_core::pipeline::read_log;

#[derive(Args)]
pub struct ParseArgs {
    /// Log file to parse
    file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = read_log(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for record in &report.records {
        println!("{record}, {}", record.unit());
    }
    for failure in &report.failures {
        eprintln!("{failure}");
    }
    eprintln!(
        "{} record(s), {} rejected line(s)",
        report.records.len(),
        report.failures.len()
    );
    Ok(())
}
