//! Command-line arguments

use super::schema::AppConfig;
use crate::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Cardiovascular-disease risk prediction service
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cvd-risk")]
#[command(version)]
#[command(about = "Serve a pre-trained cardiovascular-risk classifier behind a JSON prediction endpoint")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fit the preprocessor, load the model and serve predictions over HTTP
    Serve(ServeArgs),

    /// Run one request body from a file through the pipeline
    Predict(PredictArgs),

    /// Fit the preprocessor and print its learned parameters
    Inspect(InspectArgs),
}

/// Artifact locations shared by every command
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct ArtifactArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the model artifact path
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Override the reference dataset path
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

impl ArtifactArgs {
    /// Load the configuration file (or defaults) and apply overrides
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        Ok(config)
    }
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Address to listen on
    #[arg(long)]
    pub addr: Option<SocketAddr>,
}

/// Arguments for the predict command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// JSON request body, e.g. {"features": [{...}]}
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Output format for the inspect command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Parse arguments from an iterator (for testing)
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
