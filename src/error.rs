//! Error types for the Leave Accrual & Ledger Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating durations,
//! writing ledger entries, and maintaining balances.

use thiserror::Error;

use crate::models::EntryType;

/// The main error type for the Leave Accrual & Ledger Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date or time range was inconsistent.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// A description of what made the range invalid.
        message: String,
    },

    /// The roster template was malformed.
    #[error("Invalid roster: {message}")]
    InvalidRoster {
        /// A description of what made the roster invalid.
        message: String,
    },

    /// A non-upsert write collided with an existing idempotency key.
    #[error("Duplicate {entry_type} entry for employee '{employee_id}' with key '{key}'")]
    DuplicateConflict {
        /// The employee the write targeted.
        employee_id: String,
        /// The type of the conflicting entry.
        entry_type: EntryType,
        /// The period key or leave request id that already exists.
        key: String,
    },

    /// The target employee does not exist.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        employee_id: String,
    },

    /// A ledger write was structurally invalid.
    #[error("Invalid ledger entry: {message}")]
    InvalidEntry {
        /// A description of what made the entry invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The underlying store failed.
    #[error("Store error: {message}")]
    Store {
        /// The failure reported by the store.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_displays_message() {
        let error = EngineError::InvalidRange {
            message: "end date 2026-01-01 is before start date 2026-01-02".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid range: end date 2026-01-01 is before start date 2026-01-02"
        );
    }

    #[test]
    fn test_invalid_roster_displays_message() {
        let error = EngineError::InvalidRoster {
            message: "day end must be after day start".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid roster: day end must be after day start"
        );
    }

    #[test]
    fn test_duplicate_conflict_displays_type_and_key() {
        let error = EngineError::DuplicateConflict {
            employee_id: "emp_001".to_string(),
            entry_type: EntryType::Accrual,
            key: "2026-03".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate ACCRUAL entry for employee 'emp_001' with key '2026-03'"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/roster.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/roster.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_store_error_displays_message() {
        let error = EngineError::Store {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "Store error: connection reset");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_employee_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound {
                employee_id: "emp_404".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_employee_not_found()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(EngineError::EmployeeNotFound { .. })
        ));
    }
}
