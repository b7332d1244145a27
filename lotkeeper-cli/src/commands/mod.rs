//! CLI command implementations.
//!
//! - `init`: create the data directory and database
//! - `slot`: add, list, and withdraw or restore slots
//! - `enter` / `exit`: the two gate operations
//! - `override`: move a session to another slot
//! - `force_end`: close a session by id
//! - `sessions`: active sessions or a vehicle's history
//! - `estimate`: quote the charge for a stay so far
//! - `alerts`: overstaying sessions
//! - `status`: occupancy counts
//! - `verify`: slot/session invariant and integrity check
//! - `validate`: check a configuration file
//! - `completions`: shell completion scripts

pub mod alerts;
pub mod completions;
pub mod enter;
pub mod estimate;
pub mod exit;
pub mod force_end;
pub mod init;
pub mod override_slot;
pub mod sessions;
pub mod slot;
pub mod status;
pub mod validate;
pub mod verify;

pub use alerts::AlertsCommand;
pub use completions::CompletionsCommand;
pub use enter::EnterCommand;
pub use estimate::EstimateCommand;
pub use exit::ExitCommand;
pub use force_end::ForceEndCommand;
pub use init::InitCommand;
pub use override_slot::OverrideCommand;
pub use sessions::SessionsCommand;
pub use slot::SlotCommand;
pub use status::StatusCommand;
pub use validate::ValidateCommand;
pub use verify::VerifyCommand;
