// sentrystack-cli/src/main.rs
//
// Entry point for the `sentrystack` binary.
//
// Responsibilities include:
// - Parsing command-line arguments.
// - Setting up logging.
// - Listing sessions (--list-dir) or running the stacking batch.
// - Mapping fatal errors to a red message on stderr and exit code 1.
//
// A batch with failed events still exits 0; the summary reports them.

use clap::Parser;
use console::style;
use log::info;
use sentrystack_cli::logging::{get_timestamp, init_logging};
use sentrystack_cli::{Cli, run_list, run_stack};
use std::io;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("Sentrystack run started: {}", get_timestamp());

    let result = if cli.list_dir {
        run_list(&cli.sentry_dir, &mut io::stdout().lock()).map(|count| {
            info!("{count} session(s) listed");
        })
    } else {
        run_stack(&cli).map(|summary| {
            info!(
                "Finished: {} encoded, {} planned, {} skipped, {} failed",
                summary.encoded(),
                summary.planned(),
                summary.skipped(),
                summary.failed()
            );
        })
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}
