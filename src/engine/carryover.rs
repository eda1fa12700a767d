//! Year-end carryover roll-forward.

use tracing::{debug, info};

use crate::calculation::closing_balance;
use crate::error::EngineResult;
use crate::models::{EmployeeLeaveConfig, EntryType, LedgerEntry, NewLedgerEntry, PeriodKey};
use crate::store::LedgerQuery;

use super::LeaveEngine;
use super::locks::acquire;

impl LeaveEngine {
    /// Materializes the closing balance of `year - 1` as the `CARRYOVER`
    /// entry for `year`.
    ///
    /// Returns `Ok(None)` without writing if the entry already exists; the
    /// entry is not recomputed, and leave or adjustments booked against
    /// `year - 1` afterwards stay live next to it. Otherwise the new entry is
    /// written, even for a zero balance, and then every other `CARRYOVER`
    /// entry of the employee is deleted. A failed write leaves the previous
    /// carryover in place.
    pub fn ensure_carryover_from_previous_year(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<Option<LedgerEntry>> {
        let (config, handle) = self.employee_lock(employee_id)?;
        let _guard = acquire(&handle)?;

        let written = self.carryover_locked(&config, year)?;
        if written.is_some() {
            self.sync_locked(&config)?;
        }
        Ok(written)
    }

    pub(super) fn carryover_locked(
        &self,
        config: &EmployeeLeaveConfig,
        year: i32,
    ) -> EngineResult<Option<LedgerEntry>> {
        let employee_id = config.employee_id.as_str();
        let key = PeriodKey::carryover(year);

        let existing = self.ledger.query(
            employee_id,
            &LedgerQuery::new().entry_type(EntryType::Carryover),
        )?;
        if existing.iter().any(|e| e.has_period_key(&key)) {
            debug!(
                employee_id = %employee_id,
                period_key = %key,
                "Carryover already materialized"
            );
            return Ok(None);
        }

        let entries = self.ledger.query(employee_id, &LedgerQuery::new())?;
        let closing = closing_balance(&entries, year - 1);

        let notes = format!(
            "Closing balance {}: accrued {}, carryover {}, adjustments {}, taken {} (minutes)",
            year - 1,
            closing.accrued,
            closing.carryover,
            closing.adjustments,
            closing.taken
        );
        let entry = self
            .ledger
            .upsert(NewLedgerEntry::carryover(employee_id, year, closing.total, notes))?;

        let removed = self
            .ledger
            .delete_where(employee_id, EntryType::Carryover, &|e| !e.has_period_key(&key))?;

        info!(
            employee_id = %employee_id,
            year,
            amount_minutes = closing.total,
            superseded = removed,
            "Carryover rolled forward"
        );

        Ok(Some(entry))
    }
}
