//! Employee leave configuration.
//!
//! This module defines [`EmployeeLeaveConfig`], the read-only slice of an
//! employee record the engine needs: hours per day, annual entitlement,
//! employment start date, working days and legacy opening balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::roster::WorkingDays;

/// Number of working weeks that make up the statutory (legal) entitlement.
pub const STATUTORY_WEEKS: i64 = 4;

/// The unit an annual entitlement is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementUnit {
    /// Whole or fractional working days.
    Days,
    /// Hours.
    Hours,
}

/// An annual leave entitlement in days or hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// The amount, in `unit`.
    pub amount: Decimal,
    /// The unit of `amount`.
    pub unit: EntitlementUnit,
}

impl Entitlement {
    /// An entitlement of `days` working days.
    pub fn days(days: Decimal) -> Self {
        Self {
            amount: days,
            unit: EntitlementUnit::Days,
        }
    }

    /// An entitlement of `hours` hours.
    pub fn hours(hours: Decimal) -> Self {
        Self {
            amount: hours,
            unit: EntitlementUnit::Hours,
        }
    }
}

/// Balances recorded before the ledger existed, in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalance {
    /// Pre-existing vacation balance.
    #[serde(default)]
    pub vacation_days: Decimal,
    /// Pre-existing carryover balance.
    #[serde(default)]
    pub carryover_days: Decimal,
}

fn default_hours_per_day() -> Decimal {
    Decimal::from(8)
}

/// The leave-related configuration of one employee.
///
/// # Examples
///
/// ```
/// use leave_engine::models::{EmployeeLeaveConfig, Entitlement};
/// use rust_decimal::Decimal;
///
/// let config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(Decimal::from(24)));
/// assert_eq!(config.annual_leave_minutes(), 11520);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLeaveConfig {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Contract hours per working day; used to normalize day amounts.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// The annual leave entitlement.
    pub annual_entitlement: Entitlement,
    /// The date the employee started, if known.
    #[serde(default)]
    pub employment_start_date: Option<NaiveDate>,
    /// The week days the employee works.
    #[serde(default)]
    pub working_days: WorkingDays,
    /// Legacy balances absorbed into the ledger on first use.
    #[serde(default)]
    pub opening_balance: OpeningBalance,
}

impl EmployeeLeaveConfig {
    /// Creates a configuration with default hours, working days and no
    /// opening balance.
    pub fn new(employee_id: impl Into<String>, annual_entitlement: Entitlement) -> Self {
        Self {
            employee_id: employee_id.into(),
            hours_per_day: default_hours_per_day(),
            annual_entitlement,
            employment_start_date: None,
            working_days: WorkingDays::default(),
            opening_balance: OpeningBalance::default(),
        }
    }

    /// Returns `hours_per_day`, falling back to 8 when it is not positive.
    pub fn effective_hours_per_day(&self) -> Decimal {
        if self.hours_per_day > Decimal::ZERO {
            self.hours_per_day
        } else {
            default_hours_per_day()
        }
    }

    /// Converts a number of days into whole minutes.
    pub fn days_to_minutes(&self, days: Decimal) -> i64 {
        decimal_minutes(days * self.effective_hours_per_day() * Decimal::from(60))
    }

    /// Returns the annual entitlement in whole minutes.
    pub fn annual_leave_minutes(&self) -> i64 {
        match self.annual_entitlement.unit {
            EntitlementUnit::Days => self.days_to_minutes(self.annual_entitlement.amount),
            EntitlementUnit::Hours => {
                decimal_minutes(self.annual_entitlement.amount * Decimal::from(60))
            }
        }
    }

    /// Returns the statutory part of the annual entitlement in minutes:
    /// four working weeks, capped at the annual entitlement.
    pub fn statutory_leave_minutes(&self) -> i64 {
        let days = Decimal::from(STATUTORY_WEEKS * self.working_days.days_per_week() as i64);
        self.days_to_minutes(days)
            .min(self.annual_leave_minutes())
            .max(0)
    }
}

fn decimal_minutes(value: Decimal) -> i64 {
    value.round().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayCode;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_annual_minutes_from_days() {
        let config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(dec("24")));
        assert_eq!(config.annual_leave_minutes(), 24 * 8 * 60);
    }

    #[test]
    fn test_annual_minutes_from_hours() {
        let config = EmployeeLeaveConfig::new("emp_001", Entitlement::hours(dec("182.5")));
        assert_eq!(config.annual_leave_minutes(), 10950);
    }

    #[test]
    fn test_annual_minutes_uses_hours_per_day() {
        let mut config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(dec("20")));
        config.hours_per_day = dec("7.6");
        assert_eq!(config.annual_leave_minutes(), 9120);
    }

    #[test]
    fn test_non_positive_hours_per_day_falls_back_to_eight() {
        let mut config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(dec("1")));
        config.hours_per_day = Decimal::ZERO;
        assert_eq!(config.annual_leave_minutes(), 480);
    }

    #[test]
    fn test_statutory_minutes_four_weeks() {
        let config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(dec("25")));
        assert_eq!(config.statutory_leave_minutes(), 20 * 8 * 60);
    }

    #[test]
    fn test_statutory_minutes_part_time_and_capped() {
        let mut config = EmployeeLeaveConfig::new("emp_001", Entitlement::days(dec("10")));
        config.working_days = WorkingDays::new([
            WeekdayCode::Monday,
            WeekdayCode::Tuesday,
            WeekdayCode::Wednesday,
        ]);
        // four weeks of three days is twelve days, capped at ten
        assert_eq!(config.statutory_leave_minutes(), 10 * 8 * 60);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "employee_id": "emp_002",
            "annual_entitlement": { "amount": "25", "unit": "days" }
        }"#;

        let config: EmployeeLeaveConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hours_per_day, dec("8"));
        assert_eq!(config.working_days, WorkingDays::default());
        assert_eq!(config.employment_start_date, None);
        assert_eq!(config.opening_balance, OpeningBalance::default());
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "employee_id": "emp_003",
            "hours_per_day": "7.5",
            "annual_entitlement": { "amount": "150", "unit": "hours" },
            "employment_start_date": "2026-03-16",
            "working_days": ["ma", "di", "do"],
            "opening_balance": { "vacation_days": "2.5", "carryover_days": "1" }
        }"#;

        let config: EmployeeLeaveConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.working_days.days_per_week(), 3);
        assert_eq!(
            config.employment_start_date,
            NaiveDate::from_ymd_opt(2026, 3, 16)
        );
        assert_eq!(config.days_to_minutes(config.opening_balance.vacation_days), 1125);
    }
}
