//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Medsync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Medsync - OpenMRS to DHIS2 encounter sync tool
#[derive(Parser, Debug)]
#[command(name = "medsync")]
#[command(version, about, long_about = None)]
#[command(author = "Medsync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "medsync.toml", env = "MEDSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync patient encounters from OpenMRS to DHIS2 for every rostered location
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show recorded sync progress per location
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
