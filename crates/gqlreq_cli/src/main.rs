//! Main entry point for the gqlreq CLI.

use clap::Parser;
use gqlreq_cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "gqlreq=debug"
    } else if cli.quiet {
        "gqlreq=error"
    } else {
        "gqlreq=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = gqlreq_cli::run(cli)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
