// libs/availability-cell/src/services/validation.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use shared_models::error::BookingError;

/// Minimum slot granularity in minutes.
pub const MIN_SLOT_MINUTES: i64 = 5;

/// Normalize a (date, start time, duration) triple into absolute start/end
/// instants. Pure: the caller supplies `now` so the past-interval check is
/// deterministic under test.
pub fn validate_slot_times(
    date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: i64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), BookingError> {
    if duration_minutes < MIN_SLOT_MINUTES {
        return Err(BookingError::InvalidTimeRange(format!(
            "duration must be at least {} minutes, got {}",
            MIN_SLOT_MINUTES, duration_minutes
        )));
    }

    let start = date.and_time(start_time).and_utc();
    let end = start
        .checked_add_signed(Duration::minutes(duration_minutes))
        .ok_or_else(|| {
            BookingError::InvalidTimeRange("computed end time is out of range".to_string())
        })?;

    validate_instant_range(start, end, now)?;

    Ok((start, end))
}

/// Check a pre-computed `[start, end)` interval: it must be non-empty and may
/// not lie entirely in the past (doctors do not publish historical slots).
pub fn validate_instant_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    if end <= start {
        return Err(BookingError::InvalidTimeRange(
            "end must be after start".to_string(),
        ));
    }

    if end <= now {
        return Err(BookingError::InvalidTimeRange(
            "slot interval lies entirely in the past".to_string(),
        ));
    }

    Ok(())
}
