//! Bucket deduction against the cached balance.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::{DeductionOutcome, apply_deduction};
use crate::error::EngineResult;
use crate::models::DeductionPolicy;

use super::LeaveEngine;
use super::locks::acquire;

impl LeaveEngine {
    /// Draws `requested_minutes` from the employee's cached buckets in the
    /// order `policy` gives, and stores the updated buckets.
    ///
    /// Never fails for lack of balance: whatever no bucket may absorb is
    /// dropped and reported in [`DeductionOutcome::unapplied_hours`]. Callers
    /// that must refuse insufficient balances check before deducting.
    ///
    /// The ledger is untouched; the next sync recomputes the buckets from
    /// it. Use [`record_leave_taken`](Self::record_leave_taken) to book leave.
    pub fn deduct(
        &self,
        employee_id: &str,
        requested_minutes: i64,
        policy: &DeductionPolicy,
    ) -> EngineResult<DeductionOutcome> {
        let (_, handle) = self.employee_lock(employee_id)?;
        let _guard = acquire(&handle)?;

        let balance = self.employees.load_balance(employee_id)?;
        let outcome = apply_deduction(&balance, requested_minutes, policy)?;
        self.employees.store_balance(employee_id, &outcome.balance)?;

        if outcome.unapplied_hours > Decimal::ZERO {
            warn!(
                employee_id = %employee_id,
                requested_minutes,
                unapplied_hours = %outcome.unapplied_hours,
                "Deduction exceeded available balance"
            );
        }
        info!(
            employee_id = %employee_id,
            requested_minutes,
            legal_minutes = outcome.balance.legal_minutes,
            non_legal_minutes = outcome.balance.non_legal_minutes,
            carryover_minutes = outcome.balance.carryover_minutes,
            "Deduction applied"
        );

        Ok(outcome)
    }

    /// [`deduct`](Self::deduct) with the engine's default policy.
    pub fn deduct_with_default_policy(
        &self,
        employee_id: &str,
        requested_minutes: i64,
    ) -> EngineResult<DeductionOutcome> {
        self.deduct(employee_id, requested_minutes, &self.default_policy)
    }
}
