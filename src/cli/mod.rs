//! CLI module for FishCast
//!
//! - `serve`: run the HTTP API
//! - `usage`: print the primary provider's usage snapshot

pub mod serve;
pub mod usage;

use clap::{Parser, Subcommand};

/// FishCast - AI fishing spot analysis with quota-aware provider fallback
#[derive(Parser)]
#[command(name = "fishcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// Print today's primary provider usage as JSON
    Usage(usage::UsageArgs),
}
