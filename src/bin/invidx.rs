//! invidx - build an inverted index from text files
//!
//! # Examples
//!
//! ```bash
//! # Index three files into ./indice_final.txt
//! invidx a.txt b.txt c.txt
//!
//! # Smaller chunks, four workers, JSON summary
//! invidx --chunk-size 65536 --workers 4 --format json docs/*.txt
//! ```

use clap::Parser;
use invidx::cli::output::print_error;
use invidx::cli::{run, Cli, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.log_format, cli.quiet);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Install the stderr status stream.
fn init_tracing(format: LogFormat, quiet: bool) {
    let default_filter = if quiet { "invidx=warn" } else { "invidx=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
