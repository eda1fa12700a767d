//! The leave engine service.
//!
//! [`LeaveEngine`] ties the pure calculations to the collaborator stores and
//! exposes the operations the surrounding application calls:
//!
//! - [`LeaveEngine::calculate_duration`]
//! - [`LeaveEngine::ensure_accrual_up_to_date`] (rolls carryover forward)
//! - [`LeaveEngine::ensure_carryover_from_previous_year`]
//! - [`LeaveEngine::deduct`]
//! - [`LeaveEngine::get_balance_summary`] / [`LeaveEngine::get_year_summary`]
//! - [`LeaveEngine::record_manual_adjustment`]
//! - [`LeaveEngine::record_leave_taken`]
//! - [`LeaveEngine::sync_from_ledger`]
//!
//! Every mutating operation runs under the employee's lock, from its first
//! ledger read to its cache sync.

mod accrual;
mod carryover;
mod clock;
mod deduction;
mod locks;

use std::sync::{Arc, Mutex};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{
    calculate_duration, closing_balance, open_balance_entries, snapshot_from_entries, summarize,
};
use crate::config::RosterProvider;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BalanceSnapshot, BalanceSummary, DeductionPolicy, EmployeeLeaveConfig, LeaveRequest,
    LedgerEntry, NewLedgerEntry, PeriodKey,
};
use crate::store::{EmployeeDirectory, LedgerQuery, LedgerStore, SettingsReader};

pub use accrual::AccrualReport;
pub use clock::{Clock, FixedClock, SystemClock};

use locks::{EmployeeLocks, acquire};

/// The outcome of booking an approved leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBooking {
    /// The minutes the request covers.
    pub minutes: i64,
    /// The `TAKEN` entry written.
    pub entry: LedgerEntry,
    /// The cached balance after the booking.
    pub balance: BalanceSnapshot,
}

/// The leave accrual and ledger engine.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use leave_engine::config::ConfigLoader;
/// use leave_engine::engine::{FixedClock, LeaveEngine};
/// use leave_engine::models::{EmployeeLeaveConfig, Entitlement};
/// use leave_engine::store::{InMemoryEmployeeDirectory, InMemoryLedgerStore};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let settings = ConfigLoader::from_yaml_strs(
///     "calculation:\n  rounding_minutes: 15\n",
///     "day_start: \"08:00\"\nday_end: \"17:00\"\n",
/// )?;
/// let employees = Arc::new(InMemoryEmployeeDirectory::new());
/// employees.upsert_employee(EmployeeLeaveConfig::new(
///     "emp_001",
///     Entitlement::days(Decimal::from(24)),
/// ))?;
///
/// let ledger = Arc::new(InMemoryLedgerStore::new());
/// let engine = LeaveEngine::new(ledger, employees, Arc::new(settings))
///     .with_clock(FixedClock(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
///
/// engine.ensure_accrual_up_to_date("emp_001", 2026)?;
/// assert_eq!(engine.get_balance_summary("emp_001")?.accrued, 3 * 960);
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
pub struct LeaveEngine {
    ledger: Arc<dyn LedgerStore>,
    employees: Arc<dyn EmployeeDirectory>,
    roster: RosterProvider,
    clock: Arc<dyn Clock>,
    default_policy: DeductionPolicy,
    locks: EmployeeLocks,
}

impl LeaveEngine {
    /// Creates an engine using the system clock and the default deduction
    /// policy.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        employees: Arc<dyn EmployeeDirectory>,
        settings: Arc<dyn SettingsReader>,
    ) -> Self {
        Self {
            ledger,
            employees,
            roster: RosterProvider::new(settings),
            clock: Arc::new(SystemClock),
            default_policy: DeductionPolicy::default(),
            locks: EmployeeLocks::default(),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the default deduction policy.
    pub fn with_default_policy(mut self, policy: DeductionPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Returns the default deduction policy.
    pub fn default_policy(&self) -> &DeductionPolicy {
        &self.default_policy
    }

    /// Calculates the working minutes a leave request covers, using the
    /// employee's working days and the current roster.
    pub fn calculate_duration(&self, request: &LeaveRequest) -> EngineResult<i64> {
        request.validate()?;
        let config = self.employees.get_leave_config(&request.employee_id)?;
        self.duration_for(request, &config)
    }

    fn duration_for(
        &self,
        request: &LeaveRequest,
        config: &EmployeeLeaveConfig,
    ) -> EngineResult<i64> {
        let roster = self.roster.get_roster()?;
        let rounding = self.roster.rounding_minutes()?;
        calculate_duration(request, &config.working_days, &roster, rounding)
    }

    /// Aggregates the employee's live ledger entries.
    ///
    /// Pure read: closed years are represented only by the current carryover
    /// entry. Run [`ensure_accrual_up_to_date`](Self::ensure_accrual_up_to_date)
    /// first for an up-to-date figure.
    pub fn get_balance_summary(&self, employee_id: &str) -> EngineResult<BalanceSummary> {
        let entries = self.ledger.query(employee_id, &LedgerQuery::new())?;
        Ok(summarize(open_balance_entries(&entries)))
    }

    /// Aggregates one calendar year, including leave and adjustments booked
    /// against it after its roll-forward. The total is the closing balance
    /// carried into `year + 1`.
    pub fn get_year_summary(&self, employee_id: &str, year: i32) -> EngineResult<BalanceSummary> {
        let entries = self.ledger.query(employee_id, &LedgerQuery::new())?;
        Ok(closing_balance(&entries, year))
    }

    /// Brings accruals and carryover current for this year, then returns the
    /// cached balance.
    pub fn refresh_balance(&self, employee_id: &str) -> EngineResult<BalanceSnapshot> {
        let year = self.clock.today().year();
        Ok(self.ensure_accrual_up_to_date(employee_id, year)?.balance)
    }

    /// Records a manual correction of `minutes` (positive credits, negative
    /// debits) in the current month.
    pub fn record_manual_adjustment(
        &self,
        employee_id: &str,
        minutes: i64,
        note: &str,
        actor: &str,
    ) -> EngineResult<LedgerEntry> {
        if minutes == 0 {
            return Err(EngineError::InvalidEntry {
                message: "adjustment amount must not be zero".to_string(),
            });
        }

        let (config, handle) = self.employee_lock(employee_id)?;
        let _guard = acquire(&handle)?;

        let period_key = PeriodKey::month_of(self.clock.today());
        let entry = self.ledger.append(NewLedgerEntry::adjustment(
            employee_id,
            minutes,
            period_key,
            actor,
            note,
        ))?;

        info!(
            employee_id = %employee_id,
            amount_minutes = minutes,
            actor = %actor,
            period_key = ?entry.period_key,
            "Manual adjustment recorded"
        );

        self.sync_locked(&config)?;
        Ok(entry)
    }

    /// Books an approved leave request: computes its duration, appends the
    /// `TAKEN` entry and syncs the cached balance.
    ///
    /// # Errors
    ///
    /// `InvalidRange` for a malformed request (nothing is written),
    /// `EmployeeNotFound`, or `DuplicateConflict` if the request was already
    /// booked.
    pub fn record_leave_taken(
        &self,
        request: &LeaveRequest,
        actor: &str,
    ) -> EngineResult<LeaveBooking> {
        request.validate()?;

        let (config, handle) = self.employee_lock(&request.employee_id)?;
        let _guard = acquire(&handle)?;

        let minutes = self.duration_for(request, &config)?;

        let entry = self.ledger.append(NewLedgerEntry::taken(
            &request.employee_id,
            &request.id,
            request.start_date,
            minutes,
            actor,
        ))?;

        info!(
            employee_id = %request.employee_id,
            leave_request_id = %request.id,
            minutes,
            "Leave taken recorded"
        );

        let balance = self.sync_locked(&config)?;
        Ok(LeaveBooking {
            minutes,
            entry,
            balance,
        })
    }

    /// Recomputes the cached bucket totals from the ledger and stores them.
    pub fn sync_from_ledger(&self, employee_id: &str) -> EngineResult<BalanceSnapshot> {
        let (config, handle) = self.employee_lock(employee_id)?;
        let _guard = acquire(&handle)?;

        self.sync_locked(&config)
    }

    /// Looks the employee up, then hands out their lock. Unknown ids never
    /// get one.
    fn employee_lock(
        &self,
        employee_id: &str,
    ) -> EngineResult<(EmployeeLeaveConfig, Arc<Mutex<()>>)> {
        let config = self.employees.get_leave_config(employee_id)?;
        let handle = self.locks.handle(employee_id)?;
        Ok((config, handle))
    }

    fn sync_locked(&self, config: &EmployeeLeaveConfig) -> EngineResult<BalanceSnapshot> {
        let entries = self.ledger.query(&config.employee_id, &LedgerQuery::new())?;
        let snapshot = snapshot_from_entries(&entries, config.statutory_leave_minutes());
        self.employees.store_balance(&config.employee_id, &snapshot)?;

        debug!(
            employee_id = %config.employee_id,
            legal_minutes = snapshot.legal_minutes,
            non_legal_minutes = snapshot.non_legal_minutes,
            carryover_minutes = snapshot.carryover_minutes,
            "Balance cache synced"
        );

        Ok(snapshot)
    }
}

impl std::fmt::Debug for LeaveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaveEngine")
            .field("roster", &self.roster)
            .field("default_policy", &self.default_policy)
            .finish_non_exhaustive()
    }
}
