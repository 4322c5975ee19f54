use bib2tree::{Error, cli::Cli, driver, resolver::DoiResolver};
use clap::{CommandFactory, Parser};
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bib2tree=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();
    match driver::run(&config, &DoiResolver) {
        Ok(report) => {
            eprintln!("{}", report.summary());
            Ok(())
        }
        // Not a failure of the process: nothing was asked for, so nothing is done.
        Err(Error::NoInput) => {
            eprintln!(
                "{} {}\n\n{}",
                "error:".if_supports_color(Stream::Stderr, |t| t.red()),
                Error::NoInput,
                Cli::command().render_usage()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
