use std::path::Path;

use anyhow::{Context, Result};
use aristarchos_tools::fixtures::{self, FILES_PER_DAY, FIXTURE_DAYS};
use aristarchos_tools::logging;
use chrono::Local;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "make-dummy-fits")]
#[command(about = "Create empty, randomly numbered FITS files for today and the two days before")]
#[command(version)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();
    logging::init();

    let dates = fixtures::target_dates(Local::now().date_naive(), FIXTURE_DAYS);
    let report =
        fixtures::generate_fixtures(Path::new("."), &dates, FILES_PER_DAY, &mut rand::rng())
            .context("failed to create dummy fits files")?;
    info!(files = report.created.len(), "dummy fits files created");

    print!("{}", report.summary);
    Ok(())
}
