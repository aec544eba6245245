//! CLI application rendering KSeF e-invoices to PDF.

mod commands;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, render};

/// KSeF invoice visualizer - render e-invoice XML as printable A4 PDF
#[derive(Parser)]
#[command(name = "ksef-pdf")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Input XML file (shorthand for `render INPUT OUTPUT`)
    input: Option<PathBuf>,

    /// Output PDF file
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single invoice to PDF
    Render(render::RenderArgs),

    /// Print the extracted invoice data as JSON
    Extract(extract::ExtractArgs),

    /// Render multiple invoice files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    // Execute command
    match (cli.command, cli.input, cli.output) {
        (Some(Commands::Render(args)), ..) => render::run(args, config_path).await,
        (Some(Commands::Extract(args)), ..) => extract::run(args, config_path).await,
        (Some(Commands::Batch(args)), ..) => batch::run(args, config_path).await,
        (Some(Commands::Config(args)), ..) => config::run(args, config_path).await,
        (None, Some(input), Some(output)) => {
            render::run(render::RenderArgs { input, output }, config_path).await
        }
        (None, ..) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "expected INPUT and OUTPUT paths, or a subcommand",
            )
            .exit(),
    }
}
