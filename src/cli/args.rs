// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Schema-validated configuration file parser
#[derive(Parser, Debug)]
#[command(name = "confspec")]
#[command(author = "confspec team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse and lint KEY=VALUE configuration files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flatten InspectArgs so `confspec app.conf` works without a subcommand.
    #[command(flatten)]
    pub inspect_args: InspectArgs,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Load settings from a specific file instead of the default locations
    #[arg(long, value_name = "CONFIG_FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Override the comment marker
    #[arg(long, value_name = "CHAR", global = true)]
    pub comment_marker: Option<char>,

    /// Override the assignment marker
    #[arg(long, value_name = "CHAR", global = true)]
    pub assignment_marker: Option<char>,

    /// Override the line-continuation marker
    #[arg(long, value_name = "CHAR", global = true)]
    pub continuation_marker: Option<char>,

    /// Match keywords exactly instead of uppercasing them
    #[arg(long, global = true, default_value_t = false)]
    pub case_sensitive_keys: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a file without a schema and print its entries (default)
    Inspect(InspectArgs),

    /// Check file syntax and report malformed lines
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// File to inspect
    #[arg(required = false)]
    pub file: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl Cli {
    /// Helper to get effective InspectArgs
    pub fn get_inspect_args(&self) -> &InspectArgs {
        match &self.command {
            Some(Commands::Inspect(args)) => args,
            _ => &self.inspect_args,
        }
    }
}

fn is_json_format(value: &str) -> bool {
    value.eq_ignore_ascii_case("json")
}

impl InspectArgs {
    pub fn is_json(&self) -> bool {
        is_json_format(&self.format)
    }
}

impl CheckArgs {
    pub fn is_json(&self) -> bool {
        is_json_format(&self.format)
    }
}
