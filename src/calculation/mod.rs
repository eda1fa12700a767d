//! Calculation logic for the Leave Accrual & Ledger Engine.
//!
//! This module contains the pure calculation functions: roster-aware leave
//! duration, exact-remainder monthly accrual with hire-month pro-ration,
//! ledger aggregation (year breakdown, open balance window, cached bucket
//! snapshot), and the ordered bucket deduction walk.

mod accrual;
mod deduction;
mod duration;
mod summary;

pub use accrual::{
    accrual_for_month, calculate_monthly_accrual_minutes, cumulative_accrual_target,
    days_in_month, last_accrual_month, prorate_hire_month,
};
pub use deduction::{BucketDraw, DeductionOutcome, apply_deduction};
pub use duration::{DayDuration, calculate_duration, day_durations, round_to_increment};
pub use summary::{
    closing_balance, open_balance_entries, snapshot_from_entries, summarize, year_breakdown,
};
