//! Which slot categories accept which vehicle categories.
//!
//! The matrix is a pure function. Automatic allocation takes the lowest slot
//! number across a vehicle's acceptable set, with one exception: an electric
//! vehicle is offered any free charging bay before a regular or compact one.

use crate::category::{SlotCategory, VehicleCategory};

const CAR: &[SlotCategory] = &[SlotCategory::Regular, SlotCategory::Compact];
const BIKE: &[SlotCategory] = &[SlotCategory::Regular];
const ELECTRIC_VEHICLE: &[SlotCategory] = &[
    SlotCategory::ElectricCharging,
    SlotCategory::Regular,
    SlotCategory::Compact,
];
const ACCESSIBLE_NEED: &[SlotCategory] = &[
    SlotCategory::AccessibleReserved,
    SlotCategory::Regular,
    SlotCategory::Compact,
];

/// Returns the slot categories a vehicle may occupy.
///
/// # Examples
///
/// ```
/// use lotkeeper::{compatible_slot_categories, SlotCategory, VehicleCategory};
///
/// let slots = compatible_slot_categories(VehicleCategory::ElectricVehicle);
/// assert_eq!(slots[0], SlotCategory::ElectricCharging);
/// assert!(!compatible_slot_categories(VehicleCategory::Bike).contains(&SlotCategory::Compact));
/// ```
#[must_use]
pub const fn compatible_slot_categories(vehicle: VehicleCategory) -> &'static [SlotCategory] {
    match vehicle {
        VehicleCategory::Car => CAR,
        VehicleCategory::Bike => BIKE,
        VehicleCategory::ElectricVehicle => ELECTRIC_VEHICLE,
        VehicleCategory::AccessibleNeed => ACCESSIBLE_NEED,
    }
}

/// Whether a slot of `slot` category may hold a vehicle of `vehicle` category.
#[must_use]
pub fn is_compatible(vehicle: VehicleCategory, slot: SlotCategory) -> bool {
    compatible_slot_categories(vehicle).contains(&slot)
}

/// The allocation tier of `slot` for `vehicle` (0 is best), or `None` when
/// the two are incompatible. Slots in the same tier are taken in slot-number
/// order.
///
/// # Examples
///
/// ```
/// use lotkeeper::{preference_rank, SlotCategory, VehicleCategory};
///
/// assert_eq!(preference_rank(VehicleCategory::ElectricVehicle, SlotCategory::ElectricCharging), Some(0));
/// assert_eq!(preference_rank(VehicleCategory::ElectricVehicle, SlotCategory::Compact), Some(1));
/// assert_eq!(preference_rank(VehicleCategory::Car, SlotCategory::Compact), Some(0));
/// ```
#[must_use]
pub fn preference_rank(vehicle: VehicleCategory, slot: SlotCategory) -> Option<usize> {
    if !is_compatible(vehicle, slot) {
        return None;
    }
    match (vehicle, slot) {
        (VehicleCategory::ElectricVehicle, SlotCategory::ElectricCharging) => Some(0),
        (VehicleCategory::ElectricVehicle, _) => Some(1),
        _ => Some(0),
    }
}
