//! The billing calculator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::BillingMode;

use super::{Amount, RateSlab, RateTable};

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// The outcome of pricing one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingBreakdown {
    /// The charge.
    pub amount: Amount,
    /// Whole hours billed, partial hours rounded up.
    pub duration_hours: u32,
    /// The hourly slab that priced the session, if one did.
    pub applied_slab: Option<RateSlab>,
    /// Whether the duration ran past the last slab and was capped.
    pub capped: bool,
}

/// Whole billable hours between `entry` and `exit`; any partial hour counts.
///
/// A non-positive span bills zero hours.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use lotkeeper::billable_hours;
///
/// let entry = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// assert_eq!(billable_hours(entry, entry + Duration::minutes(60)), 1);
/// assert_eq!(billable_hours(entry, entry + Duration::minutes(61)), 2);
/// ```
#[must_use]
pub fn billable_hours(entry: DateTime<Utc>, exit: DateTime<Utc>) -> u32 {
    let millis = (exit - entry).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let hours = millis.saturating_add(MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR;
    u32::try_from(hours).unwrap_or(u32::MAX)
}

/// Prices a session.
///
/// Day-pass sessions pay the flat day-pass rate whatever their length.
/// Hourly sessions pay the slab containing their billable hours, or the last
/// slab's rate when they run past every slab. A zero-hour hourly session
/// matches no slab and is charged nothing.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lotkeeper::{compute_amount, Amount, BillingMode, RateTable};
///
/// let rates = RateTable::default();
/// let entry = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// let exit = Utc.with_ymd_and_hms(2024, 1, 1, 13, 1, 0).unwrap();
///
/// let bill = compute_amount(entry, exit, BillingMode::Hourly, &rates);
/// assert_eq!(bill.duration_hours, 4);
/// assert_eq!(bill.amount, Amount::new(150));
/// ```
#[must_use]
pub fn compute_amount(
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
    mode: BillingMode,
    rates: &RateTable,
) -> BillingBreakdown {
    let duration_hours = billable_hours(entry, exit);

    match mode {
        BillingMode::DayPass => BillingBreakdown {
            amount: rates.day_pass(),
            duration_hours,
            applied_slab: None,
            capped: false,
        },
        BillingMode::Hourly => {
            if let Some(slab) = rates.slab_for(duration_hours) {
                BillingBreakdown {
                    amount: slab.rate,
                    duration_hours,
                    applied_slab: Some(*slab),
                    capped: false,
                }
            } else if duration_hours > rates.cap().max_hours {
                let cap = *rates.cap();
                BillingBreakdown {
                    amount: cap.rate,
                    duration_hours,
                    applied_slab: Some(cap),
                    capped: true,
                }
            } else {
                BillingBreakdown {
                    amount: Amount::ZERO,
                    duration_hours,
                    applied_slab: None,
                    capped: false,
                }
            }
        }
    }
}

/// Renders the raw span between `entry` and `exit` as `"Xh Ym"`.
///
/// Display only; seconds are truncated and billing never reads this.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use lotkeeper::format_duration;
///
/// let entry = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// assert_eq!(format_duration(entry, entry + Duration::minutes(185)), "3h 5m");
/// ```
#[must_use]
pub fn format_duration(entry: DateTime<Utc>, exit: DateTime<Utc>) -> String {
    let millis = (exit - entry).num_milliseconds().max(0);
    let hours = millis / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    format!("{hours}h {minutes}m")
}
