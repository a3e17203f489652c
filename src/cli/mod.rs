//! CLI module
//!
//! Command-line interface definitions and handlers for the Orion query client.
//!
//! # Commands
//!
//! - `endpoints` - List the endpoint table
//! - `query` - Fetch an endpoint once and print the response
//! - `watch` - Poll an endpoint and print every settled fetch
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Count flow runs once
//! orion query flow_runs_count
//!
//! # Poll the ten most recent flow runs every 5 seconds
//! orion watch flow_runs --limit 10 --interval-ms 5000
//! ```

pub mod completions;
pub mod config;
pub mod endpoints;
pub mod output;
pub mod query;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::OrionConfig;
use crate::endpoints::EndpointName;
use crate::query::FilterBody;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Orion query client
#[derive(Parser, Debug)]
#[command(
    name = "orion",
    version,
    about = "Query and poll the Orion orchestration API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known endpoints
    Endpoints(EndpointsArgs),
    /// Fetch an endpoint once
    Query(QueryArgs),
    /// Poll an endpoint on an interval
    Watch(WatchArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that talk to the API
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "orion.toml")]
    pub config: PathBuf,

    /// Override the API base URL
    #[arg(long, env = "ORION_API_URL")]
    pub api_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, env = "ORION_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Filter options turned into the request body
#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// Raw JSON filter body (merged under --limit/--offset)
    #[arg(short, long)]
    pub body: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Number of results to skip
    #[arg(long)]
    pub offset: Option<u32>,
}

impl BodyArgs {
    /// Build the filter body; explicit flags override fields from `--body`.
    pub fn to_filter(&self) -> Result<FilterBody, serde_json::Error> {
        let mut filter = match &self.body {
            Some(raw) => serde_json::from_str::<FilterBody>(raw)?,
            None => FilterBody::default(),
        };
        if let Some(limit) = self.limit {
            filter.limit = Some(limit);
        }
        if let Some(offset) = self.offset {
            filter.offset = Some(offset);
        }
        Ok(filter)
    }
}

#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Endpoint name (see `orion endpoints`)
    pub endpoint: EndpointName,

    #[command(flatten)]
    pub filter: BodyArgs,

    /// Print compact JSON instead of pretty output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Endpoint name (see `orion endpoints`)
    pub endpoint: EndpointName,

    #[command(flatten)]
    pub filter: BodyArgs,

    /// Poll interval in milliseconds (0 or >= 1000); defaults to config
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many fetches
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Print compact JSON lines
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "orion.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ConnectionArgs,
) -> Result<OrionConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        OrionConfig::load(Some(&args.config))?
    } else {
        OrionConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides (highest priority)
    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}
