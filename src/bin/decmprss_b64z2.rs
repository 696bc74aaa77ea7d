use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use aristarchos_tools::{logging, payload};
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "decmprss-b64z2")]
#[command(about = "Decode the base64 + bzip2 message following 'BF=' in a file")]
#[command(version)]
struct Args {
    /// File holding the message within its first 4096 bytes
    file: PathBuf,
}

// Exit status is 1 when the message was decomposed and 0 when it was not.
fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init();

    let extraction = payload::extract(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    debug!(decomposed = extraction.is_decomposed(), "extraction finished");

    for line in extraction.report_lines() {
        println!("{}", line);
    }

    Ok(ExitCode::from(extraction.exit_code()))
}
