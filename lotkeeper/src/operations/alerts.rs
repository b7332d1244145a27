//! Read-only views over Active sessions: overstay alerts and cost estimates.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::billing::{compute_amount, format_duration, Amount};
use crate::category::{BillingMode, Severity, VehicleCategory};
use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::overstay::classify;
use crate::session::SessionId;
use crate::slot::SlotNumber;
use crate::vehicle::LicensePlate;

use super::lifecycle::LifecycleManager;

/// An Active session past one of its overstay thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverstayAlert {
    /// The overstaying session.
    pub session_id: SessionId,
    /// Its vehicle.
    pub plate: LicensePlate,
    /// The vehicle's category.
    pub vehicle_category: VehicleCategory,
    /// The slot it occupies.
    pub slot_number: SlotNumber,
    /// How it is billed.
    pub billing_mode: BillingMode,
    /// When it entered.
    pub entry_time: DateTime<Utc>,
    /// The highest threshold crossed.
    pub severity: Severity,
    /// Hours since entry.
    pub elapsed_hours: f64,
    /// Hours past the crossed threshold.
    pub overstay_hours: f64,
    /// What the session would be charged if it ended now.
    pub estimated_cost: Amount,
}

/// A running charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostEstimate {
    /// The instant the estimate was computed for.
    pub as_of: DateTime<Utc>,
    /// Wall-clock stay so far as `"Xh Ym"`.
    pub current_duration: String,
    /// Billable hours so far, rounded up.
    pub duration_hours: u32,
    /// The charge if the session ended at `as_of`.
    pub estimated_amount: Amount,
}

fn by_urgency(a: &OverstayAlert, b: &OverstayAlert) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.overstay_hours.total_cmp(&a.overstay_hours))
        .then_with(|| a.session_id.cmp(&b.session_id))
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Classifies every Active session against its thresholds.
    ///
    /// Returned most urgent first: by severity, then by hours overstayed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be read.
    pub fn overstay_alerts(&self) -> Result<Vec<OverstayAlert>> {
        let now = self.clock.now();
        let sessions = Database::list_active_sessions(self.db.connection())?;

        let mut alerts: Vec<OverstayAlert> = sessions
            .into_iter()
            .filter_map(|session| {
                let found = classify(
                    session.entry_time,
                    now,
                    session.billing_mode,
                    session.vehicle_category,
                    &self.settings.thresholds,
                    &self.settings.rates,
                )?;
                Some(OverstayAlert {
                    session_id: session.id,
                    plate: session.plate,
                    vehicle_category: session.vehicle_category,
                    slot_number: session.slot_number,
                    billing_mode: session.billing_mode,
                    entry_time: session.entry_time,
                    severity: found.severity,
                    elapsed_hours: found.elapsed_hours,
                    overstay_hours: found.overstay_hours,
                    estimated_cost: found.estimated_cost,
                })
            })
            .collect();

        alerts.sort_by(by_urgency);
        log::debug!("{} overstay alert(s) as of {now}", alerts.len());
        Ok(alerts)
    }

    /// What a session entered at `entry_time` would be charged now.
    #[must_use]
    pub fn estimate(&self, entry_time: DateTime<Utc>, mode: BillingMode) -> CostEstimate {
        let now = self.clock.now();
        let bill = compute_amount(entry_time, now, mode, &self.settings.rates);
        CostEstimate {
            as_of: now,
            current_duration: format_duration(entry_time, now),
            duration_hours: bill.duration_hours,
            estimated_amount: bill.amount,
        }
    }

    /// The running charge of a parked vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotParked`] if the vehicle has no Active session.
    pub fn estimate_for_plate(&self, plate: &LicensePlate) -> Result<CostEstimate> {
        let session = Database::active_session_for_plate(self.db.connection(), plate)?
            .ok_or_else(|| Error::NotParked {
                plate: plate.to_string(),
            })?;
        Ok(self.estimate(session.entry_time, session.billing_mode))
    }
}
