//! CLI module for unifi-mcp - command-line interface and subcommands.

pub mod commands;

pub use commands::{Cli, Commands};
