//! Build script for lotkeeper-cli.
//!
//! Renders the `lotkeeper.1` man page into OUT_DIR with clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! outline is declared here by hand.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Keep in sync with src/cli.rs.
fn build_cli() -> Command {
    Command::new("lotkeeper")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Allocate parking slots and bill parking sessions")
        .long_about(
            "Command-line tool for running a parking facility: slot allocation at entry, \
             tiered billing at exit, operator overrides and overstay alerts",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("LOTKEEPER_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("LOTKEEPER_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("LOTKEEPER_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the lotkeeper database and optionally a default config.yaml"),
            Command::new("slot")
                .about("Manage the slot inventory")
                .long_about("Add and list slots, put them under maintenance and restore them"),
            Command::new("enter")
                .about("Register a vehicle entering the facility")
                .long_about("Open a parking session, auto-assigning a compatible slot unless one is given"),
            Command::new("exit")
                .about("Register a vehicle leaving and bill its session")
                .long_about("Complete the vehicle's active session, free its slot and print the charge"),
            Command::new("override")
                .about("Move an active session to another slot")
                .long_about("Reassign a session's slot; billing still runs from the original entry time"),
            Command::new("force-end")
                .about("Close a session by id, billing it as of now")
                .long_about("Complete a session for a vehicle that left without passing the exit gate"),
            Command::new("sessions")
                .about("List active sessions or a vehicle's history")
                .long_about("Show every active session, or with --plate one vehicle's sessions newest first"),
            Command::new("estimate")
                .about("Estimate the charge for a stay so far")
                .long_about("Quote a parked vehicle, or a hypothetical stay from an entry time"),
            Command::new("alerts")
                .about("List sessions past their overstay thresholds")
                .long_about("Classify active sessions as warning, alert or critical, most urgent first"),
            Command::new("status")
                .about("Show slot occupancy")
                .long_about("Count slots by status and show availability per slot category"),
            Command::new("verify")
                .about("Check slot and session invariants")
                .long_about("Run the integrity check and report slots or vehicles in an inconsistent state"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a lotkeeper configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("lotkeeper.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
