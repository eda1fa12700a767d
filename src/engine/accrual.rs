//! Accrual bookkeeping: opening balance seed and monthly accrual upserts.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{accrual_for_month, last_accrual_month};
use crate::error::EngineResult;
use crate::models::{BalanceSnapshot, EmployeeLeaveConfig, EntryType, NewLedgerEntry, PeriodKey};
use crate::store::LedgerQuery;

use super::LeaveEngine;
use super::locks::acquire;

/// What [`LeaveEngine::ensure_accrual_up_to_date`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualReport {
    /// Whether the opening balance was seeded on this call.
    pub opening_seeded: bool,
    /// Months whose accrual entry was created or changed.
    pub months_written: Vec<u32>,
    /// Whether a carryover entry was written by the roll-forward.
    pub carryover_written: bool,
    /// The cached balance after the call.
    pub balance: BalanceSnapshot,
}

impl LeaveEngine {
    /// Brings the employee's `ACCRUAL` entries for `year` current.
    ///
    /// Seeds the opening balance if the employee has no ledger entries yet,
    /// rolls the previous year's closing balance forward when `year` is the
    /// current or a future year, then upserts one accrual per month through
    /// December for past years or the current month for the current year.
    /// Future years get no accruals. Calling it again writes nothing new.
    pub fn ensure_accrual_up_to_date(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<AccrualReport> {
        let (config, handle) = self.employee_lock(employee_id)?;
        let _guard = acquire(&handle)?;

        let today = self.clock.today();
        let mut report = AccrualReport {
            opening_seeded: self.seed_opening_balance(&config, year)?,
            ..AccrualReport::default()
        };

        if year >= today.year() {
            report.carryover_written = self.carryover_locked(&config, year)?.is_some();
        }

        if let Some(last_month) = last_accrual_month(year, today) {
            report.months_written = self.book_accruals(&config, year, last_month)?;
        }

        report.balance = self.sync_locked(&config)?;

        info!(
            employee_id = %employee_id,
            year,
            opening_seeded = report.opening_seeded,
            months_written = report.months_written.len(),
            carryover_written = report.carryover_written,
            "Accrual up to date"
        );

        Ok(report)
    }

    /// Writes the legacy opening balance once, before the first ledger entry.
    fn seed_opening_balance(&self, config: &EmployeeLeaveConfig, year: i32) -> EngineResult<bool> {
        if self.ledger.count(&config.employee_id)? > 0 {
            return Ok(false);
        }

        let opening = &config.opening_balance;
        let vacation = config.days_to_minutes(opening.vacation_days);
        let carryover = config.days_to_minutes(opening.carryover_days);

        if vacation != 0 {
            self.ledger.append(NewLedgerEntry::adjustment(
                &config.employee_id,
                vacation,
                PeriodKey::opening(year),
                "system",
                &format!("Opening balance: {} days", opening.vacation_days.normalize()),
            ))?;
        }
        if carryover != 0 {
            self.ledger.upsert(NewLedgerEntry::carryover(
                &config.employee_id,
                year,
                carryover,
                format!("Opening carryover: {} days", opening.carryover_days.normalize()),
            ))?;
        }

        let seeded = vacation != 0 || carryover != 0;
        if seeded {
            info!(
                employee_id = %config.employee_id,
                year,
                vacation_minutes = vacation,
                carryover_minutes = carryover,
                "Opening balance seeded"
            );
        }
        Ok(seeded)
    }

    fn book_accruals(
        &self,
        config: &EmployeeLeaveConfig,
        year: i32,
        last_month: u32,
    ) -> EngineResult<Vec<u32>> {
        let annual = config.annual_leave_minutes();
        if annual <= 0 {
            debug!(
                employee_id = %config.employee_id,
                annual_minutes = annual,
                "No entitlement, nothing to accrue"
            );
            return Ok(Vec::new());
        }

        let existing = self.ledger.query(
            &config.employee_id,
            &LedgerQuery::new()
                .entry_type(EntryType::Accrual)
                .period_prefix(PeriodKey::year_prefix(year)),
        )?;

        let mut written = Vec::new();
        for month in 1..=last_month {
            let hired = config.employment_start_date;
            let Some(amount) = accrual_for_month(annual, year, month, hired)? else {
                continue;
            };
            if amount == 0 {
                continue;
            }

            let key = PeriodKey::month(year, month);
            let unchanged = existing
                .iter()
                .any(|e| e.has_period_key(&key) && e.amount_minutes == amount);
            if unchanged {
                debug!(
                    employee_id = %config.employee_id,
                    period_key = %key,
                    "Accrual already booked"
                );
                continue;
            }

            self.ledger
                .upsert(NewLedgerEntry::accrual(&config.employee_id, year, month, amount))?;
            debug!(
                employee_id = %config.employee_id,
                period_key = %key,
                amount_minutes = amount,
                "Accrual booked"
            );
            written.push(month);
        }

        Ok(written)
    }
}
