//! Core data models for the Leave Accrual & Ledger Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod balance;
mod employee;
mod leave_request;
mod ledger_entry;
mod roster;

pub use balance::{
    BalanceSnapshot, BalanceSummary, Bucket, BucketRule, DeductionPolicy, hours_to_minutes,
    minutes_to_hours,
};
pub use employee::{
    EmployeeLeaveConfig, Entitlement, EntitlementUnit, OpeningBalance, STATUTORY_WEEKS,
};
pub use leave_request::LeaveRequest;
pub use ledger_entry::{
    CARRYOVER_KEY_PREFIX, EntryType, LedgerEntry, NewLedgerEntry, OPENING_KEY_PREFIX, PeriodKey,
};
pub use roster::{BreakWindow, RosterTemplate, WeekdayCode, WorkingDays};
