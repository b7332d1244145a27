//! Configuration system for lotkeeper.
//!
//! Pricing, overstay thresholds and engine limits come from layered YAML
//! files, `LOTKEEPER_*` environment variables and programmatic overrides.
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`LOTKEEPER_*`)
//! 3. Local site config (`lotkeeper.local.yaml`)
//! 4. Site config (`lotkeeper.yaml`)
//! 5. Operator config (`<data-dir>/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use lotkeeper::config::ConfigBuilder;
//! use lotkeeper::Settings;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let settings = Settings::from_config(&config).unwrap();
//! println!("day pass: {}", settings.rates.day_pass());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{
    Config, EngineConfig, OutputFormat, OverstayConfig, RatesConfig, SlabConfig, ThresholdConfig,
    ThresholdsByCategory,
};
pub use validator::ConfigValidator;
