mod cli;
mod config;
mod connector;
mod error;
mod ssh;

use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use error::DockhandError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_informational(e.kind()) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let default_filter = if cli.verbose {
        "dockhand=debug"
    } else {
        "dockhand=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = cli.execute().await {
        report_error(&e);
        std::process::exit(1);
    }
}

/// Help and version output exit 0; every other parse error exits 1.
fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn report_error(err: &DockhandError) {
    eprintln!("{} {}", style("Error:").red().bold(), err);

    if err.is_expected() {
        return;
    }

    if let DockhandError::Other(inner) = err {
        for cause in inner.chain().skip(1) {
            eprintln!("  {} {}", style("caused by:").dim(), cause);
        }
        return;
    }

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  {} {}", style("caused by:").dim(), cause);
        source = cause.source();
    }
}
