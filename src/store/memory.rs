//! In-memory collaborator implementations.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{BalanceSnapshot, EmployeeLeaveConfig, EntryType, LedgerEntry, NewLedgerEntry};

use super::{EmployeeDirectory, LedgerQuery, LedgerStore};

fn poisoned<T>(_: PoisonError<T>) -> EngineError {
    EngineError::Store {
        message: "in-memory store lock poisoned".to_string(),
    }
}

fn check_shape(entry: &NewLedgerEntry) -> EngineResult<()> {
    if entry.employee_id.is_empty() {
        return Err(EngineError::InvalidEntry {
            message: "employee id must not be empty".to_string(),
        });
    }
    if entry.entry_type.is_period_keyed() && entry.period_key.is_none() {
        return Err(EngineError::InvalidEntry {
            message: format!("{} entries require a period key", entry.entry_type),
        });
    }
    match (entry.entry_type, &entry.leave_request_id) {
        (EntryType::Taken, None) => Err(EngineError::InvalidEntry {
            message: "TAKEN entries require a leave request id".to_string(),
        }),
        (EntryType::Taken, Some(_)) => Ok(()),
        (other, Some(_)) => Err(EngineError::InvalidEntry {
            message: format!("{} entries cannot reference a leave request", other),
        }),
        (_, None) => Ok(()),
    }
}

/// Returns the position of an existing entry sharing `entry`'s idempotency
/// key, and that key.
fn find_conflict(entries: &[LedgerEntry], entry: &NewLedgerEntry) -> Option<(usize, String)> {
    let key = match entry.entry_type {
        EntryType::Accrual | EntryType::Carryover => entry.period_key.as_deref()?,
        EntryType::Taken => entry.leave_request_id.as_deref()?,
        EntryType::Adjustment => return None,
    };

    entries
        .iter()
        .position(|e| {
            e.entry_type == entry.entry_type
                && match entry.entry_type {
                    EntryType::Taken => e.leave_request_id.as_deref() == Some(key),
                    _ => e.period_key.as_deref() == Some(key),
                }
        })
        .map(|pos| (pos, key.to_string()))
}

/// Creation time for the next entry in `entries`: now, or just after the
/// newest existing entry if the clock has not moved past it.
fn next_stamp(entries: &[LedgerEntry]) -> DateTime<Utc> {
    let now = Utc::now();
    match entries.iter().map(|e| e.created_at).max() {
        Some(newest) if newest >= now => newest + TimeDelta::microseconds(1),
        _ => now,
    }
}

/// A [`LedgerStore`] backed by a map of per-employee entry lists.
///
/// Each write holds the map's write lock for its whole duration, so a write
/// is either fully applied or not at all.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: RwLock<HashMap<String, Vec<LedgerEntry>>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(&self, entry: NewLedgerEntry) -> EngineResult<LedgerEntry> {
        check_shape(&entry)?;
        let mut map = self.entries.write().map_err(poisoned)?;
        let list = map.entry(entry.employee_id.clone()).or_default();

        if let Some((_, key)) = find_conflict(list, &entry) {
            return Err(EngineError::DuplicateConflict {
                employee_id: entry.employee_id,
                entry_type: entry.entry_type,
                key,
            });
        }

        let created_at = next_stamp(list);
        let stored = entry.into_entry(Uuid::new_v4(), created_at);
        list.push(stored.clone());
        Ok(stored)
    }

    fn upsert(&self, entry: NewLedgerEntry) -> EngineResult<LedgerEntry> {
        if !entry.entry_type.is_period_keyed() {
            return self.append(entry);
        }

        check_shape(&entry)?;
        let mut map = self.entries.write().map_err(poisoned)?;
        let list = map.entry(entry.employee_id.clone()).or_default();

        match find_conflict(list, &entry) {
            Some((pos, _)) => {
                let existing = &list[pos];
                let replaced = entry.into_entry(existing.id, existing.created_at);
                list[pos] = replaced.clone();
                Ok(replaced)
            }
            None => {
                let created_at = next_stamp(list);
                let stored = entry.into_entry(Uuid::new_v4(), created_at);
                list.push(stored.clone());
                Ok(stored)
            }
        }
    }

    fn query(&self, employee_id: &str, query: &LedgerQuery) -> EngineResult<Vec<LedgerEntry>> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map
            .get(employee_id)
            .map(|list| list.iter().filter(|e| query.matches(e)).cloned().collect())
            .unwrap_or_default())
    }

    fn delete_where(
        &self,
        employee_id: &str,
        entry_type: EntryType,
        predicate: &dyn Fn(&LedgerEntry) -> bool,
    ) -> EngineResult<usize> {
        if entry_type != EntryType::Carryover {
            return Err(EngineError::InvalidEntry {
                message: format!("{} entries cannot be deleted", entry_type),
            });
        }

        let mut map = self.entries.write().map_err(poisoned)?;
        let Some(list) = map.get_mut(employee_id) else {
            return Ok(0);
        };

        let before = list.len();
        list.retain(|e| !(e.entry_type == entry_type && predicate(e)));
        Ok(before - list.len())
    }

    fn count(&self, employee_id: &str) -> EngineResult<usize> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map.get(employee_id).map_or(0, Vec::len))
    }
}

#[derive(Debug, Clone)]
struct EmployeeRecord {
    config: EmployeeLeaveConfig,
    balance: BalanceSnapshot,
}

/// An [`EmployeeDirectory`] holding employee records in memory.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    records: RwLock<HashMap<String, EmployeeRecord>>,
}

impl InMemoryEmployeeDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an employee, keeping any cached balance.
    pub fn upsert_employee(&self, config: EmployeeLeaveConfig) -> EngineResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let id = config.employee_id.clone();
        match records.get_mut(&id) {
            Some(record) => record.config = config,
            None => {
                records.insert(
                    id,
                    EmployeeRecord {
                        config,
                        balance: BalanceSnapshot::default(),
                    },
                );
            }
        }
        Ok(())
    }

    fn not_found(employee_id: &str) -> EngineError {
        EngineError::EmployeeNotFound {
            employee_id: employee_id.to_string(),
        }
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn get_leave_config(&self, employee_id: &str) -> EngineResult<EmployeeLeaveConfig> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .get(employee_id)
            .map(|r| r.config.clone())
            .ok_or_else(|| Self::not_found(employee_id))
    }

    fn load_balance(&self, employee_id: &str) -> EngineResult<BalanceSnapshot> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .get(employee_id)
            .map(|r| r.balance)
            .ok_or_else(|| Self::not_found(employee_id))
    }

    fn store_balance(&self, employee_id: &str, balance: &BalanceSnapshot) -> EngineResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let record = records
            .get_mut(employee_id)
            .ok_or_else(|| Self::not_found(employee_id))?;
        record.balance = *balance;
        Ok(())
    }
}
