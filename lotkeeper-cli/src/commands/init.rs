//! Init command implementation.
//!
//! Creates the data directory and database explicitly, optionally with an
//! operator configuration file holding the built-in rates and thresholds.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Parser;
use lotkeeper::database::{Database, DatabaseConfig, DATABASE_FILE};
use std::fs;
use std::path::Path;

/// Starting point for `<data-dir>/config.yaml`; mirrors the built-in defaults.
const DEFAULT_CONFIG: &str = "\
# lotkeeper operator configuration.
# Site files (lotkeeper.yaml, lotkeeper.local.yaml) and LOTKEEPER_* variables
# override these values.

rates:
  hourly:
    - { min_hours: 0, max_hours: 1, rate: 50 }
    - { min_hours: 1, max_hours: 3, rate: 100 }
    - { min_hours: 3, max_hours: 6, rate: 150 }
    - { min_hours: 6, max_hours: 24, rate: 200 }
  day_pass: 150

overstay:
  hourly:
    car: { warning: 6, alert: 8, critical: 12 }
    bike: { warning: 6, alert: 8, critical: 12 }
    electric_vehicle: { warning: 4, alert: 6, critical: 8 }
    accessible_need: { warning: 8, alert: 10, critical: 14 }
  day_pass:
    car: { warning: 24, alert: 30, critical: 36 }
    bike: { warning: 24, alert: 30, critical: 36 }
    electric_vehicle: { warning: 24, alert: 30, critical: 36 }
    accessible_need: { warning: 24, alert: 30, critical: 36 }

engine:
  transaction_timeout_seconds: 10
  max_allocation_attempts: 2
";

/// Initialize the lotkeeper data directory and database.
#[derive(Parser)]
#[command(about = "Initialize the lotkeeper data directory and database")]
pub struct InitCommand {
    /// Replace an existing database (all slots and sessions are lost)
    #[arg(long)]
    overwrite: bool,

    /// Also write a default config.yaml
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` has no effect here.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        let db_path = data_dir.join(DATABASE_FILE);
        let config_path = data_dir.join("config.yaml");

        if db_path.exists() && !self.overwrite && !self.dry_run {
            return Err(CliError::InvalidArguments(format!(
                "database already exists at {} (use --overwrite to replace it)",
                db_path.display()
            )));
        }

        if self.dry_run {
            self.preview(&data_dir, &db_path, &config_path);
            return Ok(());
        }

        let data_dir_created = !data_dir.exists();
        fs::create_dir_all(&data_dir)?;

        if db_path.exists() {
            remove_database(&db_path)?;
        }
        Database::open(DatabaseConfig::new(&db_path))?;

        let config_created = self.with_config && !config_path.exists();
        if config_created {
            fs::write(&config_path, DEFAULT_CONFIG)?;
        }

        if !global.quiet {
            println!("Initialized lotkeeper in: {}", data_dir.display());
            if data_dir_created {
                println!("  - Created data directory");
            }
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
            if config_created {
                println!("  - Created default configuration file");
            } else if self.with_config {
                println!("  - Configuration file already exists (not overwritten)");
            }
        }

        Ok(())
    }

    fn preview(&self, data_dir: &Path, db_path: &Path, config_path: &Path) {
        println!("Dry-run mode: no changes will be made");
        println!();
        println!("Would initialize lotkeeper in: {}", data_dir.display());

        if data_dir.exists() {
            println!("  - Data directory already exists: {}", data_dir.display());
        } else {
            println!("  - Create data directory: {}", data_dir.display());
        }

        match (db_path.exists(), self.overwrite) {
            (true, true) => {
                println!("  - Remove existing database: {}", db_path.display());
                println!("  - Create new database: {}", db_path.display());
            }
            (true, false) => println!(
                "  - ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            ),
            (false, _) => println!("  - Create database: {}", db_path.display()),
        }

        if self.with_config {
            if config_path.exists() {
                println!(
                    "  - Configuration file already exists (will not overwrite): {}",
                    config_path.display()
                );
            } else {
                println!("  - Create configuration file: {}", config_path.display());
            }
        }
    }
}

/// Removes the database file along with its WAL and shared-memory siblings.
fn remove_database(db_path: &Path) -> Result<(), CliError> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sibling = db_path.as_os_str().to_owned();
        sibling.push(suffix);
        let sibling = Path::new(&sibling);
        if sibling.exists() {
            fs::remove_file(sibling)?;
        }
    }
    Ok(())
}
