//! Render command - convert a single invoice to PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Input KSeF XML file
    pub input: PathBuf,

    /// Output PDF file
    pub output: PathBuf,
}

pub async fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Rendering file: {}", args.input.display());
    let xml = fs::read_to_string(&args.input)?;

    let pdf =
        tokio::task::spawn_blocking(move || ksef_core::convert_with_config(&xml, &config))
            .await??;

    super::write_atomic(&args.output, &pdf)?;

    println!(
        "{} PDF written to {}",
        style("✓").green(),
        args.output.display()
    );
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
