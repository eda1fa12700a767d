//! Monthly accrual calculation.
//!
//! Annual entitlement is spread over the twelve months with an exact-remainder
//! allocation: the cumulative target through month `m` is
//! `floor(annual * m / 12)` and month `m` books the difference to the previous
//! target. The twelve bookings therefore always sum to the annual entitlement.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};

fn check_month(month: u32) -> EngineResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(EngineError::CalculationError {
            message: format!("month index {} is outside 1..=12", month),
        })
    }
}

/// Returns the cumulative accrual target through `month` (0 for month 0).
///
/// # Example
///
/// ```
/// use leave_engine::calculation::cumulative_accrual_target;
///
/// assert_eq!(cumulative_accrual_target(100, 1), 8);
/// assert_eq!(cumulative_accrual_target(100, 12), 100);
/// ```
pub fn cumulative_accrual_target(annual_minutes: i64, month: u32) -> i64 {
    (annual_minutes * i64::from(month.min(12))).div_euclid(12)
}

/// Returns the accrual booked for `month` (1..=12) of an annual entitlement.
///
/// # Errors
///
/// Returns `CalculationError` if `month` is outside `1..=12`.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::calculate_monthly_accrual_minutes;
///
/// assert_eq!(calculate_monthly_accrual_minutes(11520, 1).unwrap(), 960);
/// assert_eq!(calculate_monthly_accrual_minutes(11520, 12).unwrap(), 960);
/// assert_eq!(calculate_monthly_accrual_minutes(100, 1).unwrap(), 8);
/// assert_eq!(calculate_monthly_accrual_minutes(100, 3).unwrap(), 9);
/// ```
pub fn calculate_monthly_accrual_minutes(annual_minutes: i64, month: u32) -> EngineResult<i64> {
    check_month(month)?;
    Ok(cumulative_accrual_target(annual_minutes, month)
        - cumulative_accrual_target(annual_minutes, month - 1))
}

/// Returns the number of days in a month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

/// Pro-rates a full-month accrual for an employee who started on
/// `start_date`, by `(days_in_month - start_day + 1) / days_in_month`,
/// floored to whole minutes.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::prorate_hire_month;
/// use chrono::NaiveDate;
///
/// // started on the 16th of a 30-day month: 15/30 of the month
/// let start = NaiveDate::from_ymd_opt(2026, 4, 16).unwrap();
/// assert_eq!(prorate_hire_month(960, start), 480);
/// ```
pub fn prorate_hire_month(full_month_minutes: i64, start_date: NaiveDate) -> i64 {
    let dim = i64::from(days_in_month(start_date.year(), start_date.month()));
    let worked_days = dim - i64::from(start_date.day()) + 1;
    (full_month_minutes * worked_days).div_euclid(dim)
}

/// Returns the accrual for a calendar month, taking the employment start
/// date into account.
///
/// Returns `Ok(None)` for months before the hire month (no booking at all);
/// the hire month itself is pro-rated; later months get the full amount.
pub fn accrual_for_month(
    annual_minutes: i64,
    year: i32,
    month: u32,
    employment_start: Option<NaiveDate>,
) -> EngineResult<Option<i64>> {
    let full = calculate_monthly_accrual_minutes(annual_minutes, month)?;

    let Some(start) = employment_start else {
        return Ok(Some(full));
    };

    let target = (year, month);
    let hired = (start.year(), start.month());
    Ok(if target < hired {
        None
    } else if target == hired {
        Some(prorate_hire_month(full, start))
    } else {
        Some(full)
    })
}

/// Returns the last month that should be accrued for `year` given today's
/// date: December for past years, the current month for the current year,
/// and nothing for future years.
pub fn last_accrual_month(year: i32, today: NaiveDate) -> Option<u32> {
    match year.cmp(&today.year()) {
        std::cmp::Ordering::Less => Some(12),
        std::cmp::Ordering::Equal => Some(today.month()),
        std::cmp::Ordering::Greater => None,
    }
}
