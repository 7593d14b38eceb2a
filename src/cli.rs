use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oaslint")]
#[command(version)]
#[command(about = "Guideline linter for OpenAPI 3 and Swagger 2 documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check an API document against the enabled guidelines
    Lint {
        /// Path to the OpenAPI or Swagger file (YAML or JSON)
        file: PathBuf,

        /// Rules configuration (built-in defaults if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Rule set to enable; replaces the configured sets, repeatable
        #[arg(short, long = "rule-set")]
        rule_set: Vec<String>,

        /// Worker threads for running checks
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Abort when checking takes longer than this
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List known rules and whether they are enabled
    Rules {
        /// Rules configuration (built-in defaults if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable
    Text,
    /// JSON array of violations
    Json,
}
