//! Batch command - render many invoice files concurrently.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use ksef_core::{InvoiceExtractor, InvoiceRenderer, KsefConfig, KsefXmlParser};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for the PDF files
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Facts about one successfully rendered invoice.
#[derive(Debug)]
struct Rendered {
    invoice_number: Option<String>,
    gross_total: Option<String>,
    currency: String,
    pages: usize,
}

/// Result of processing a single file.
struct ProcessResult {
    index: usize,
    path: PathBuf,
    outcome: Result<Rendered, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::load_config(config_path)?);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let jobs = output_paths(&files, &args.output_dir)?;
    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Documents are independent: each worker gets its own parser and renderer.
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let stop = Arc::new(AtomicBool::new(false));
    let continue_on_error = args.continue_on_error;
    let mut tasks = JoinSet::new();

    for (index, (path, output_path)) in jobs.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let config = Arc::clone(&config);
        let stop = Arc::clone(&stop);
        let pb = pb.clone();

        tasks.spawn_blocking(move || {
            let _permit = permit;
            if stop.load(Ordering::SeqCst) {
                return None;
            }
            let file_start = Instant::now();
            let outcome = match render_file(&path, &output_path, &config, &stop) {
                Ok(Some(rendered)) => Ok(rendered),
                Ok(None) => return None,
                Err(e) => Err(e.to_string()),
            };
            if outcome.is_err() && !continue_on_error {
                stop.store(true, Ordering::SeqCst);
            }
            pb.inc(1);
            Some(ProcessResult {
                index,
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            })
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(e) if e.is_cancelled() => continue,
            Err(e) => return Err(e.into()),
        };
        if let Err(message) = &result.outcome {
            if continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                tasks.abort_all();
            }
        }
        results.push(result);
    }
    results.sort_by_key(|r| r.index);

    if !continue_on_error {
        if let Some((path, message)) = results.iter().find_map(|r| {
            r.outcome.as_ref().err().map(|message| (&r.path, message))
        }) {
            pb.abandon();
            anyhow::bail!("Processing failed for {}: {}", path.display(), message);
        }
    }

    pb.finish_with_message("Complete");

    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let successful = results.len() - failed.len();

    // Generate summary if requested
    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

/// Pair each input with its PDF path, rejecting inputs whose names collide.
fn output_paths(files: &[PathBuf], output_dir: &Path) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let mut claimed: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    let mut jobs = Vec::with_capacity(files.len());

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let output_path = output_dir.join(format!("{stem}.pdf"));
        if let Some(previous) = claimed.insert(output_path.clone(), path) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                path.display(),
                output_path.display()
            );
        }
        jobs.push((path.clone(), output_path));
    }

    Ok(jobs)
}

/// Render one file; `Ok(None)` means the batch was stopped before the PDF was written.
fn render_file(
    path: &Path,
    output_path: &Path,
    config: &KsefConfig,
    stop: &AtomicBool,
) -> anyhow::Result<Option<Rendered>> {
    let invoice = KsefXmlParser::with_config(config.extraction.clone()).extract_file(path)?;

    let renderer = InvoiceRenderer::with_config(config.render.clone())?;
    let document = renderer.layout(&invoice);
    let pdf = renderer.serialize(&document)?;

    if stop.load(Ordering::SeqCst) {
        debug!("Skipping {} after an earlier failure", path.display());
        return Ok(None);
    }
    super::write_atomic(output_path, &pdf)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(Some(Rendered {
        invoice_number: invoice.invoice_number,
        gross_total: invoice.gross_total,
        currency: invoice.currency_code,
        pages: document.page_count(),
    }))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "gross_total",
        "currency",
        "pages",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(rendered) => wtr.write_record([
                filename,
                "success",
                rendered.invoice_number.as_deref().unwrap_or(""),
                rendered.gross_total.as_deref().unwrap_or(""),
                &rendered.currency,
                &rendered.pages.to_string(),
                &time,
                "",
            ])?,
            Err(message) => wtr.write_record([
                filename, "error", "", "", "", "", &time, message,
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_follow_file_stems() {
        let files = vec![PathBuf::from("in/a.xml"), PathBuf::from("in/b.XML")];
        let jobs = output_paths(&files, Path::new("out")).unwrap();

        assert_eq!(jobs[0].1, Path::new("out/a.pdf"));
        assert_eq!(jobs[1].1, Path::new("out/b.pdf"));
    }

    #[test]
    fn test_output_paths_reject_same_stem() {
        let files = vec![PathBuf::from("a/x.xml"), PathBuf::from("b/x.xml")];
        let err = output_paths(&files, Path::new("out")).unwrap_err().to_string();

        assert!(err.contains("a/x.xml"));
        assert!(err.contains("b/x.xml"));
    }
}
