//! Contracts of the external collaborators and their in-memory versions.
//!
//! The engine consumes three collaborators:
//! - a [`LedgerStore`] holding the append-only ledger,
//! - an [`EmployeeDirectory`] supplying leave configuration and holding the
//!   cached balance fields,
//! - a [`SettingsReader`] supplying the raw roster and rounding settings.
//!
//! [`InMemoryLedgerStore`] and [`InMemoryEmployeeDirectory`] implement the
//! first two with the semantics a database with unique indexes would give.

mod memory;

use chrono::{DateTime, Utc};

use crate::config::RosterSettings;
use crate::error::EngineResult;
use crate::models::{BalanceSnapshot, EmployeeLeaveConfig, EntryType, LedgerEntry, NewLedgerEntry};

pub use memory::{InMemoryEmployeeDirectory, InMemoryLedgerStore};

/// Filters for [`LedgerStore::query`]. Unset fields match everything.
///
/// # Example
///
/// ```
/// use leave_engine::store::LedgerQuery;
/// use leave_engine::models::EntryType;
///
/// let query = LedgerQuery::new()
///     .entry_type(EntryType::Accrual)
///     .period_prefix("2026-");
/// assert_eq!(query.entry_type, Some(EntryType::Accrual));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Only entries of this type.
    pub entry_type: Option<EntryType>,
    /// Only entries whose period key starts with this prefix.
    pub period_prefix: Option<String>,
    /// Only entries whose period key contains this text.
    pub period_contains: Option<String>,
    /// Only entries created at or after this instant.
    pub created_from: Option<DateTime<Utc>>,
    /// Only entries created before this instant.
    pub created_before: Option<DateTime<Utc>>,
}

impl LedgerQuery {
    /// A query matching every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one entry type.
    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    /// Restricts to period keys starting with `prefix`.
    pub fn period_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.period_prefix = Some(prefix.into());
        self
    }

    /// Restricts to period keys containing `text`.
    pub fn period_contains(mut self, text: impl Into<String>) -> Self {
        self.period_contains = Some(text.into());
        self
    }

    /// Restricts to entries created in `[from, before)`.
    pub fn created_between(mut self, from: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_before = Some(before);
        self
    }

    /// Returns true if `entry` passes every filter.
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        let key = entry.period_key.as_deref();
        self.entry_type.is_none_or(|t| entry.entry_type == t)
            && self
                .period_prefix
                .as_deref()
                .is_none_or(|p| key.is_some_and(|k| k.starts_with(p)))
            && self
                .period_contains
                .as_deref()
                .is_none_or(|p| key.is_some_and(|k| k.contains(p)))
            && self.created_from.is_none_or(|from| entry.created_at >= from)
            && self
                .created_before
                .is_none_or(|before| entry.created_at < before)
    }
}

/// The append-only ledger.
///
/// Implementations must make each write all-or-nothing and enforce:
/// - `(employee, type, period_key)` is unique for `ACCRUAL` and `CARRYOVER`,
/// - `TAKEN` entries are unique per leave request,
/// - `TAKEN` and `ADJUSTMENT` entries are never overwritten or deleted,
/// - a new entry's `created_at` is later than every existing entry of the
///   same employee; an overwrite keeps the original `created_at`.
pub trait LedgerStore: Send + Sync {
    /// Writes a new entry.
    ///
    /// Fails with `DuplicateConflict` if the entry's idempotency key (period
    /// key for `ACCRUAL`/`CARRYOVER`, leave request for `TAKEN`) exists.
    fn append(&self, entry: NewLedgerEntry) -> EngineResult<LedgerEntry>;

    /// Creates or overwrites the `ACCRUAL`/`CARRYOVER` entry with the same
    /// `(employee, type, period_key)`. Other types are appended.
    fn upsert(&self, entry: NewLedgerEntry) -> EngineResult<LedgerEntry>;

    /// Returns the employee's entries matching `query`, oldest first.
    fn query(&self, employee_id: &str, query: &LedgerQuery) -> EngineResult<Vec<LedgerEntry>>;

    /// Deletes the employee's entries of `entry_type` for which `predicate`
    /// holds, returning how many were removed. Only `CARRYOVER` entries may
    /// be deleted.
    fn delete_where(
        &self,
        employee_id: &str,
        entry_type: EntryType,
        predicate: &dyn Fn(&LedgerEntry) -> bool,
    ) -> EngineResult<usize>;

    /// Returns the number of entries for the employee.
    fn count(&self, employee_id: &str) -> EngineResult<usize>;
}

/// The employee record store, as far as the engine is concerned.
pub trait EmployeeDirectory: Send + Sync {
    /// Returns the employee's leave configuration, or `EmployeeNotFound`.
    fn get_leave_config(&self, employee_id: &str) -> EngineResult<EmployeeLeaveConfig>;

    /// Returns the employee's cached balance fields, or `EmployeeNotFound`.
    fn load_balance(&self, employee_id: &str) -> EngineResult<BalanceSnapshot>;

    /// Overwrites the employee's cached balance fields, or `EmployeeNotFound`.
    fn store_balance(&self, employee_id: &str, balance: &BalanceSnapshot) -> EngineResult<()>;
}

/// The organization settings store.
pub trait SettingsReader: Send + Sync {
    /// Returns the raw working-hours template.
    fn roster_settings(&self) -> EngineResult<RosterSettings>;

    /// Returns the duration rounding increment in minutes.
    fn rounding_minutes(&self) -> EngineResult<u32>;
}
