//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the MCP server (default)
//! - tools: print the tool catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MCP server for UniFi Protect and UniFi Network
#[derive(Parser, Debug)]
#[command(name = "unifi-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Agent transport: stdio or http
    #[arg(long, global = true)]
    pub transport: Option<String>,

    /// Listen address for the http transport (e.g. ":8000")
    #[arg(long, global = true)]
    pub http_addr: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP on the configured transport
    Serve,

    /// List the registered tools
    Tools,
}
