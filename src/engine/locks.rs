//! Per-employee mutual exclusion.
//!
//! Ledger reads, the computation that depends on them and the resulting
//! writes plus cache sync form one unit of work per employee. Units for the
//! same employee run one at a time; different employees do not contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{EngineError, EngineResult};

fn poisoned<T>(_: PoisonError<T>) -> EngineError {
    EngineError::Store {
        message: "employee lock poisoned".to_string(),
    }
}

/// Registry handing out one mutex per employee id.
#[derive(Debug, Default)]
pub(crate) struct EmployeeLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    /// Returns the mutex guarding `employee_id`, creating it on first use.
    pub(crate) fn handle(&self, employee_id: &str) -> EngineResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(poisoned)?;
        Ok(Arc::clone(
            locks.entry(employee_id.to_string()).or_default(),
        ))
    }

    /// Number of employees that have been handed a lock.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

/// Locks a handle returned by [`EmployeeLocks::handle`].
pub(crate) fn acquire(handle: &Mutex<()>) -> EngineResult<MutexGuard<'_, ()>> {
    handle.lock().map_err(poisoned)
}
