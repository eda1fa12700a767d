//! Ledger entry model.
//!
//! A [`LedgerEntry`] is one immutable accounting fact for one employee. New
//! entries are described by a [`NewLedgerEntry`] and become a `LedgerEntry`
//! once the store has assigned an id and creation timestamp.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of carryover period keys.
pub const CARRYOVER_KEY_PREFIX: &str = "CARRYOVER-";

/// Prefix of opening-balance adjustment period keys.
pub const OPENING_KEY_PREFIX: &str = "OPENING-";

/// The kind of accounting fact an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Monthly entitlement booking.
    Accrual,
    /// Leave consumed by an approved request.
    Taken,
    /// Manual or opening-balance correction.
    Adjustment,
    /// Year-opening balance carried from the previous year.
    Carryover,
}

impl EntryType {
    /// Returns true for types keyed by `(employee, type, period)`.
    pub fn is_period_keyed(self) -> bool {
        matches!(self, EntryType::Accrual | EntryType::Carryover)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Accrual => write!(f, "ACCRUAL"),
            EntryType::Taken => write!(f, "TAKEN"),
            EntryType::Adjustment => write!(f, "ADJUSTMENT"),
            EntryType::Carryover => write!(f, "CARRYOVER"),
        }
    }
}

/// Period key helpers.
///
/// # Example
///
/// ```
/// use leave_engine::models::PeriodKey;
///
/// assert_eq!(PeriodKey::month(2026, 3), "2026-03");
/// assert_eq!(PeriodKey::carryover(2026), "CARRYOVER-2026");
/// assert_eq!(PeriodKey::year_of("CARRYOVER-2026"), Some(2026));
/// assert_eq!(PeriodKey::year_of("2025-11"), Some(2025));
/// ```
pub struct PeriodKey;

impl PeriodKey {
    /// The `YYYY-MM` key of a monthly accrual.
    pub fn month(year: i32, month: u32) -> String {
        format!("{:04}-{:02}", year, month)
    }

    /// The `YYYY-MM` key of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> String {
        Self::month(date.year(), date.month())
    }

    /// The `CARRYOVER-YYYY` key of a year's opening carryover.
    pub fn carryover(year: i32) -> String {
        format!("{}{}", CARRYOVER_KEY_PREFIX, year)
    }

    /// The `OPENING-YYYY` key of an opening-balance adjustment.
    pub fn opening(year: i32) -> String {
        format!("{}{}", OPENING_KEY_PREFIX, year)
    }

    /// The `YYYY-` prefix shared by a year's monthly keys.
    pub fn year_prefix(year: i32) -> String {
        format!("{:04}-", year)
    }

    /// Extracts the first four-digit year contained in a key.
    pub fn year_of(key: &str) -> Option<i32> {
        let bytes = key.as_bytes();
        bytes
            .windows(4)
            .enumerate()
            .find(|(i, w)| {
                w.iter().all(u8::is_ascii_digit)
                    && (*i == 0 || !bytes[i - 1].is_ascii_digit())
                    && bytes.get(i + 4).is_none_or(|b| !b.is_ascii_digit())
            })
            .and_then(|(i, _)| key[i..i + 4].parse().ok())
    }
}

/// A ledger write that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    /// The employee the entry belongs to.
    pub employee_id: String,
    /// The entry type.
    pub entry_type: EntryType,
    /// Signed amount; negative for deductions.
    pub amount_minutes: i64,
    /// The accounting period, if any.
    pub period_key: Option<String>,
    /// The originating leave request; set only for `TAKEN`.
    pub leave_request_id: Option<String>,
    /// Start date of the originating leave request; set only for `TAKEN`.
    pub leave_start_date: Option<NaiveDate>,
    /// Who created the entry.
    pub created_by: String,
    /// Free-text explanation.
    pub notes: String,
}

impl NewLedgerEntry {
    /// A monthly accrual booking.
    pub fn accrual(employee_id: &str, year: i32, month: u32, amount_minutes: i64) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            entry_type: EntryType::Accrual,
            amount_minutes,
            period_key: Some(PeriodKey::month(year, month)),
            leave_request_id: None,
            leave_start_date: None,
            created_by: "system".to_string(),
            notes: format!("Monthly accrual {}", PeriodKey::month(year, month)),
        }
    }

    /// A year-opening carryover.
    pub fn carryover(employee_id: &str, year: i32, amount_minutes: i64, notes: String) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            entry_type: EntryType::Carryover,
            amount_minutes,
            period_key: Some(PeriodKey::carryover(year)),
            leave_request_id: None,
            leave_start_date: None,
            created_by: "system".to_string(),
            notes,
        }
    }

    /// An adjustment under `period_key`.
    pub fn adjustment(
        employee_id: &str,
        amount_minutes: i64,
        period_key: String,
        created_by: &str,
        notes: &str,
    ) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            entry_type: EntryType::Adjustment,
            amount_minutes,
            period_key: Some(period_key),
            leave_request_id: None,
            leave_start_date: None,
            created_by: created_by.to_string(),
            notes: notes.to_string(),
        }
    }

    /// Leave consumed by a request starting on `start_date`.
    pub fn taken(
        employee_id: &str,
        leave_request_id: &str,
        start_date: NaiveDate,
        minutes: i64,
        created_by: &str,
    ) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            entry_type: EntryType::Taken,
            amount_minutes: -minutes.abs(),
            period_key: Some(PeriodKey::month_of(start_date)),
            leave_request_id: Some(leave_request_id.to_string()),
            leave_start_date: Some(start_date),
            created_by: created_by.to_string(),
            notes: format!("Leave request {}", leave_request_id),
        }
    }

    /// Persists this write as an entry with the given id and timestamp.
    pub fn into_entry(self, id: Uuid, created_at: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry {
            id,
            employee_id: self.employee_id,
            entry_type: self.entry_type,
            amount_minutes: self.amount_minutes,
            period_key: self.period_key,
            leave_request_id: self.leave_request_id,
            leave_start_date: self.leave_start_date,
            created_by: self.created_by,
            notes: self.notes,
            created_at,
        }
    }
}

/// An immutable accounting fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// The employee the entry belongs to.
    pub employee_id: String,
    /// The entry type.
    pub entry_type: EntryType,
    /// Signed amount; negative for deductions.
    pub amount_minutes: i64,
    /// The accounting period, if any.
    pub period_key: Option<String>,
    /// The originating leave request; set only for `TAKEN`.
    pub leave_request_id: Option<String>,
    /// Start date of the originating leave request; set only for `TAKEN`.
    pub leave_start_date: Option<NaiveDate>,
    /// Who created the entry.
    pub created_by: String,
    /// Free-text explanation.
    pub notes: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns the calendar year this entry is accounted to.
    ///
    /// Accruals, carryovers and adjustments use the year in their period
    /// key; leave taken uses the start date of its request. Entries without
    /// either fall back to the creation year.
    pub fn attributed_year(&self) -> i32 {
        let from_key = self.period_key.as_deref().and_then(PeriodKey::year_of);
        match self.entry_type {
            EntryType::Taken => self
                .leave_start_date
                .map(|d| d.year())
                .or(from_key)
                .unwrap_or_else(|| self.created_at.year()),
            _ => from_key.unwrap_or_else(|| self.created_at.year()),
        }
    }

    /// Returns true if the period key equals `key`.
    pub fn has_period_key(&self, key: &str) -> bool {
        self.period_key.as_deref() == Some(key)
    }
}
