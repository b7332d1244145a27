//! Slot inventory commands.
//!
//! `slot add`, `slot list`, `slot maintenance` and `slot restore`.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_settings, open_database, parse_slot_number, parse_text, print_rows,
    resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use clap::{Args, Subcommand};
use lotkeeper::{LifecycleManager, ParkingSlot, SlotCategory, SlotNumber, SlotStatus};

/// Manage the slot inventory.
#[derive(Args)]
pub struct SlotCommand {
    #[command(subcommand)]
    pub action: SlotAction,
}

/// Slot subcommands.
#[derive(Subcommand)]
pub enum SlotAction {
    /// Add a slot to the inventory
    Add {
        /// Slot number, e.g. B1-04
        #[arg(value_parser = parse_slot_number)]
        number: SlotNumber,

        /// Physical kind of bay
        #[arg(long, default_value = "regular", value_parser = parse_text::<SlotCategory>)]
        category: SlotCategory,
    },

    /// List slots
    List {
        /// Only slots with this status
        #[arg(long, value_parser = parse_text::<SlotStatus>)]
        status: Option<SlotStatus>,

        /// Only slots of this category
        #[arg(long, value_parser = parse_text::<SlotCategory>)]
        category: Option<SlotCategory>,

        /// Output format
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// Withdraw an available slot from allocation
    Maintenance {
        /// Slot number
        #[arg(value_parser = parse_slot_number)]
        number: SlotNumber,
    },

    /// Return a slot under maintenance to service
    Restore {
        /// Slot number
        #[arg(value_parser = parse_slot_number)]
        number: SlotNumber,
    },
}

impl Tabular for ParkingSlot {
    const HEADERS: &'static [&'static str] = &["slot", "category", "status"];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.number.to_string(),
            self.category.to_string(),
            self.status.to_string(),
        ]
    }
}

impl SlotCommand {
    /// Execute the slot command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;
        let mut manager = LifecycleManager::new(&mut db, &settings);

        match self.action {
            SlotAction::Add { number, category } => {
                let slot = manager.add_slot(&number, category)?;
                if !global.quiet {
                    println!("Added slot {} ({})", slot.number, slot.category);
                }
            }
            SlotAction::List {
                status,
                category,
                format,
            } => {
                let slots = manager.list_slots(status, category)?;
                print_rows(&slots, resolve_format(format, &config))?;
            }
            SlotAction::Maintenance { number } => {
                let slot = manager.set_maintenance(&number)?;
                if !global.quiet {
                    println!("Slot {} is under maintenance", slot.number);
                }
            }
            SlotAction::Restore { number } => {
                let slot = manager.restore_slot(&number)?;
                if !global.quiet {
                    println!("Slot {} is available", slot.number);
                }
            }
        }

        Ok(())
    }
}
