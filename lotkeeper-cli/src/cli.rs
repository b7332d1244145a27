//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AlertsCommand, CompletionsCommand, EnterCommand, EstimateCommand, ExitCommand,
    ForceEndCommand, InitCommand, OverrideCommand, SessionsCommand, SlotCommand, StatusCommand,
    ValidateCommand, VerifyCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for running a parking facility.
#[derive(Parser)]
#[command(name = "lotkeeper")]
#[command(version, about = "Allocate parking slots and bill parking sessions", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "LOTKEEPER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "LOTKEEPER_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "LOTKEEPER_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Manage the slot inventory
    Slot(SlotCommand),

    /// Register a vehicle entering the facility
    Enter(EnterCommand),

    /// Register a vehicle leaving and bill its session
    Exit(ExitCommand),

    /// Move an active session to another slot
    Override(OverrideCommand),

    /// Close a session by id, billing it as of now
    ForceEnd(ForceEndCommand),

    /// List active sessions or a vehicle's history
    Sessions(SessionsCommand),

    /// Estimate the charge for a stay so far
    Estimate(EstimateCommand),

    /// List sessions past their overstay thresholds
    Alerts(AlertsCommand),

    /// Show slot occupancy
    Status(StatusCommand),

    /// Check slot and session invariants
    Verify(VerifyCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
