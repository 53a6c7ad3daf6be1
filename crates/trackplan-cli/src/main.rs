//! Trackplan CLI - Validate and explore parameter and event definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check, completions, config as config_cmd, export, show};
use config::{config_file_path, Config};
use output::OutputFormat;
use trackplan_core::{DefinitionGraph, NamespacePolicy};
use trackplan_loader::{DirSource, Pipeline, PipelineOptions, RunOutcome};

#[derive(Parser)]
#[command(name = "trackplan")]
#[command(author, version, about = "Validate event and parameter definitions and build their reference graph")]
pub struct Cli {
    /// Definitions directory (overrides the config file)
    #[arg(short, long, env = "TRACKPLAN_DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, env = "TRACKPLAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Namespace policy: shared, separate (overrides the config file)
    #[arg(short, long, global = true)]
    pub namespace: Option<NamespacePolicy>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate definitions and report a summary
    Check,
    /// Export the reference graph
    Export(export::ExportArgs),
    /// Show a parameter or event and its references
    Show(show::ShowArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with resolved configuration
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Config::load(&cli.config_path())?;
        if let Some(dir) = &cli.dir {
            config.definitions_dir = dir.clone();
        }
        if let Some(namespace) = cli.namespace {
            config.namespace = namespace;
        }
        tracing::debug!("Using definitions at: {:?}", config.definitions_dir);
        Ok(Self { config })
    }

    pub fn source(&self) -> DirSource {
        DirSource::new(&self.config.definitions_dir).with_extensions(self.config.extensions.clone())
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(PipelineOptions {
            namespace: self.config.namespace,
        })
    }

    /// Run the pipeline over the configured directory
    pub async fn run(&self) -> anyhow::Result<RunOutcome> {
        Ok(self.pipeline().run(&self.source()).await?)
    }

    /// Run the pipeline and require a graph
    pub async fn graph(&self) -> anyhow::Result<DefinitionGraph> {
        match self.run().await? {
            RunOutcome::Success(report) => Ok(report.graph),
            RunOutcome::Failure(report) => {
                for error in &report.errors {
                    eprintln!("{}", error);
                }
                anyhow::bail!(
                    "Definitions are invalid ({} error(s)); run 'trackplan check' for details",
                    report.errors.len()
                )
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting trackplan CLI");

    match &cli.command {
        Commands::Config(args) => return config_cmd::run(args, &cli),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let ctx = AppContext::new(&cli)?;

    match &cli.command {
        Commands::Check => check::run(&cli, &ctx).await?,
        Commands::Export(args) => export::run(args, &cli, &ctx).await?,
        Commands::Show(args) => show::run(args, &cli, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
