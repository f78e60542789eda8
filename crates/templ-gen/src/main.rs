//! templ-gen: compiler and formatter for templ template files.

mod cli;
mod output;
mod runner;

use clap::Parser;
use cli::{Args, Command};
use miette::Result;
use output::Formatter;

fn main() -> Result<()> {
    let args = Args::parse();

    let reports = match runner::run(&args.command) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let formatted = Formatter::new(args.command.output()).format(&reports);
    print!("{}", formatted);

    let summary = output::summary(&reports);
    let failed = match &args.command {
        Command::Generate {
            fail_on_diagnostics,
            ..
        } => summary.error_count > 0 || (*fail_on_diagnostics && summary.diagnostic_count > 0),
        Command::Fmt { check, .. } => summary.error_count > 0 || (*check && summary.changed_count > 0),
    };
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
