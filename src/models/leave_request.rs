//! Leave request model.
//!
//! The engine does not decide whether a request is approved; it only needs
//! the request's range to convert it into minutes and to attribute the
//! resulting `TAKEN` entry to a year.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A leave request as handed over by the workflow layer.
///
/// `start_time` and `end_time` are either both present (partial-day
/// precision at the edges of the range) or both absent (whole roster days).
///
/// # Example
///
/// ```
/// use leave_engine::models::LeaveRequest;
/// use chrono::NaiveDate;
///
/// let request = LeaveRequest::whole_days(
///     "req_001",
///     "emp_001",
///     NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
/// );
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee requesting leave.
    pub employee_id: String,
    /// First calendar day of the leave (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar day of the leave (inclusive).
    pub end_date: NaiveDate,
    /// Time-of-day the leave starts on `start_date`.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Time-of-day the leave ends on `end_date`.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl LeaveRequest {
    /// A request covering whole roster days.
    pub fn whole_days(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee_id.into(),
            start_date,
            end_date,
            start_time: None,
            end_time: None,
        }
    }

    /// Adds edge times to the request.
    pub fn with_times(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    /// Checks the range: the end may not precede the start and the times
    /// must be supplied together.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidRange {
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        if self.start_time.is_some() != self.end_time.is_some() {
            return Err(EngineError::InvalidRange {
                message: "start time and end time must be supplied together".to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if the range covers a single calendar day.
    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let request = LeaveRequest::whole_days(
            "req_1",
            "emp_1",
            make_date("2026-02-04"),
            make_date("2026-02-02"),
        );
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_single_time() {
        let day = make_date("2026-02-02");
        let mut request = LeaveRequest::whole_days("req_1", "emp_1", day, day);
        request.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(matches!(
            request.validate(),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_both_times() {
        let day = make_date("2026-02-02");
        let request = LeaveRequest::whole_days("req_1", "emp_1", day, day).with_times(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        );
        assert!(request.validate().is_ok());
        assert!(request.is_single_day());
    }

    #[test]
    fn test_deserialize_request_without_times() {
        let json = r#"{
            "id": "req_7",
            "employee_id": "emp_1",
            "start_date": "2026-07-06",
            "end_date": "2026-07-17"
        }"#;
        let request: LeaveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.start_time, None);
        assert!(!request.is_single_day());
    }
}
