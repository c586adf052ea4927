//! bikestat - Explore US bikeshare trip data from per-city CSV files

use anyhow::Context;
use bikestat::{
    cli::Cli,
    config::DatasetCatalog,
    data_loader::CsvDatasetSource,
    filters::TripFilter,
    output::get_formatter,
    session::Session,
};
use clap::Parser;
use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(cli: &Cli) {
    // --quiet and --verbose override RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("bikestat=debug,bikestat_core=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bikestat=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let catalog = DatasetCatalog::resolve(cli.data_dir.as_deref());
    info!("Reading datasets from {}", catalog.data_dir().display());

    // Progress spinner only for table output on a terminal
    let show_progress = !cli.json && is_terminal::is_terminal(io::stdout());
    let source = CsvDatasetSource::new(catalog).with_progress(show_progress);

    let mut session = Session::new(source, io::stdin().lock(), io::stdout().lock())
        .with_formatter(get_formatter(cli.json));

    match cli.city {
        Some(city) => {
            let filter = TripFilter::from_choices(cli.month_choice(), cli.day_choice());
            session
                .run_once(city, &filter, cli.raw)
                .with_context(|| format!("Failed to report on {}", city.display_name()))?;
        }
        None => session
            .run_interactive()
            .context("Interactive session ended")?,
    }

    Ok(())
}
