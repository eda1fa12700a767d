//! Leave duration calculation.
//!
//! This module converts a leave request's date/time range into a number of
//! working minutes, using the roster template for the working block and its
//! break windows, and the employee's working days to skip days off.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::error::EngineResult;
use crate::models::{LeaveRequest, RosterTemplate, WorkingDays};

/// Net working seconds of one calendar day of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayDuration {
    /// The calendar day.
    pub date: NaiveDate,
    /// Effective start of the work block on this day.
    pub block_start: NaiveTime,
    /// Effective end of the work block on this day.
    pub block_end: NaiveTime,
    /// Net working seconds after removing breaks (never negative).
    pub net_seconds: i64,
}

/// Rounds a number of seconds to the nearest multiple of `rounding_minutes`
/// minutes, returning minutes. Halves round up.
///
/// When `rounding_minutes <= 1` the result is the nearest whole minute.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::round_to_increment;
///
/// assert_eq!(round_to_increment(52 * 60, 15), 45);
/// assert_eq!(round_to_increment(53 * 60, 15), 60);
/// assert_eq!(round_to_increment(89, 1), 1);
/// assert_eq!(round_to_increment(90, 0), 2);
/// ```
pub fn round_to_increment(seconds: i64, rounding_minutes: u32) -> i64 {
    let increment_minutes = i64::from(rounding_minutes.max(1));
    let unit = increment_minutes * 60;
    let units = (seconds + unit / 2).div_euclid(unit);
    units * increment_minutes
}

/// Splits a request into per-day work blocks.
///
/// Days not in `working_days` are skipped. Times, when supplied, are clamped
/// into the roster day and only shape the first and last day; interior days
/// always use the full roster block.
pub fn day_durations(
    request: &LeaveRequest,
    working_days: &WorkingDays,
    roster: &RosterTemplate,
) -> EngineResult<Vec<DayDuration>> {
    request.validate()?;

    let edges = request.start_time.zip(request.end_time);
    let mut days = Vec::new();
    let mut date = request.start_date;

    while date <= request.end_date {
        if working_days.includes(date) {
            let block_start = match edges {
                Some((start, _)) if date == request.start_date => roster.clamp(start),
                _ => roster.day_start(),
            };
            let block_end = match edges {
                Some((_, end)) if date == request.end_date => roster.clamp(end),
                _ => roster.day_end(),
            };

            let net_seconds = if block_end > block_start {
                let gross = (block_end - block_start).num_seconds();
                (gross - roster.break_seconds_within(block_start, block_end)).max(0)
            } else {
                0
            };

            days.push(DayDuration {
                date,
                block_start,
                block_end,
                net_seconds,
            });
        }

        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(days)
}

/// Calculates the working minutes covered by a leave request.
///
/// The per-day net durations are summed and then rounded with
/// [`round_to_increment`].
///
/// # Errors
///
/// Returns `InvalidRange` if the end date precedes the start date or only one
/// of the two times is supplied. No other validation happens here; the roster
/// is already validated by construction.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::calculate_duration;
/// use leave_engine::models::{BreakWindow, LeaveRequest, RosterTemplate, WorkingDays};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let roster = RosterTemplate::new(
///     t(8, 0),
///     t(17, 0),
///     vec![BreakWindow { start: t(12, 0), end: t(12, 30) }],
/// )
/// .unwrap();
///
/// // Monday to Wednesday, whole days
/// let request = LeaveRequest::whole_days(
///     "req_001",
///     "emp_001",
///     NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
/// );
/// let minutes = calculate_duration(&request, &WorkingDays::default(), &roster, 15).unwrap();
/// assert_eq!(minutes, 1530);
/// ```
pub fn calculate_duration(
    request: &LeaveRequest,
    working_days: &WorkingDays,
    roster: &RosterTemplate,
    rounding_minutes: u32,
) -> EngineResult<i64> {
    let total_seconds: i64 = day_durations(request, working_days, roster)?
        .iter()
        .map(|d| d.net_seconds)
        .sum();

    Ok(round_to_increment(total_seconds, rounding_minutes))
}
