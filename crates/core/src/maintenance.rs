//! Maintenance date forecast derived from the RUL estimate.

use chrono::{Duration, NaiveDate};

use crate::types::Timestamp;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Calendar date (UTC) on which `rul_hours` from `now` runs out.
///
/// Returns `None` when the RUL is negative, not finite, or would overflow
/// the calendar.
pub fn next_maintenance_date(rul_hours: f64, now: Timestamp) -> Option<NaiveDate> {
    if !rul_hours.is_finite() || rul_hours < 0.0 {
        return None;
    }
    let millis = rul_hours * MILLIS_PER_HOUR;
    if millis > i64::MAX as f64 {
        return None;
    }
    let offset = Duration::try_milliseconds(millis as i64)?;
    now.checked_add_signed(offset).map(|due| due.date_naive())
}
