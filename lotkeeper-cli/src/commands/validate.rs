//! Command to validate a lotkeeper configuration file.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use lotkeeper::config::{ConfigLoader, ConfigValidator};
use lotkeeper::Settings;
use std::path::PathBuf;

/// Validate a configuration file on its own, without layering.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        if !self.config_path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.config_path.display()
            )));
        }

        let config = ConfigLoader::load_file(&self.config_path).map_err(|e| {
            eprintln!("Parse error: {e}");
            CliError::SemanticFailure("Configuration file is invalid".to_string())
        })?;

        let checked = ConfigValidator::validate(&config).and_then(|()| Settings::from_config(&config));
        match checked {
            Ok(_) => {
                println!("Configuration is valid");
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(CliError::SemanticFailure(
                    "Configuration validation failed".to_string(),
                ))
            }
        }
    }
}
