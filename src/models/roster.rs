//! Roster template and working-day models.
//!
//! This module defines the organization's daily working-hours template
//! ([`RosterTemplate`] with its [`BreakWindow`]s) and the set of week days
//! an individual employee works ([`WorkingDays`]).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A week-day code as stored on employee records.
///
/// Codes serialize in their Dutch short form (`ma`, `di`, `wo`, `do`, `vr`,
/// `za`, `zo`); parsing also accepts English abbreviations.
///
/// # Example
///
/// ```
/// use leave_engine::models::WeekdayCode;
/// use chrono::Weekday;
///
/// let code: WeekdayCode = "wo".parse().unwrap();
/// assert_eq!(code, WeekdayCode::Wednesday);
/// assert_eq!(Weekday::from(code), Weekday::Wed);
/// assert_eq!("fri".parse::<WeekdayCode>().unwrap(), WeekdayCode::Friday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeekdayCode {
    /// Monday (`ma`).
    #[serde(rename = "ma", alias = "mon")]
    Monday,
    /// Tuesday (`di`).
    #[serde(rename = "di", alias = "tue")]
    Tuesday,
    /// Wednesday (`wo`).
    #[serde(rename = "wo", alias = "wed")]
    Wednesday,
    /// Thursday (`do`).
    #[serde(rename = "do", alias = "thu")]
    Thursday,
    /// Friday (`vr`).
    #[serde(rename = "vr", alias = "fri")]
    Friday,
    /// Saturday (`za`).
    #[serde(rename = "za", alias = "sat")]
    Saturday,
    /// Sunday (`zo`).
    #[serde(rename = "zo", alias = "sun")]
    Sunday,
}

impl WeekdayCode {
    /// Returns the Dutch short code for this day.
    pub fn code(self) -> &'static str {
        match self {
            WeekdayCode::Monday => "ma",
            WeekdayCode::Tuesday => "di",
            WeekdayCode::Wednesday => "wo",
            WeekdayCode::Thursday => "do",
            WeekdayCode::Friday => "vr",
            WeekdayCode::Saturday => "za",
            WeekdayCode::Sunday => "zo",
        }
    }
}

impl fmt::Display for WeekdayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WeekdayCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ma" | "mon" | "monday" => Ok(WeekdayCode::Monday),
            "di" | "tue" | "tuesday" => Ok(WeekdayCode::Tuesday),
            "wo" | "wed" | "wednesday" => Ok(WeekdayCode::Wednesday),
            "do" | "thu" | "thursday" => Ok(WeekdayCode::Thursday),
            "vr" | "fri" | "friday" => Ok(WeekdayCode::Friday),
            "za" | "sat" | "saturday" => Ok(WeekdayCode::Saturday),
            "zo" | "sun" | "sunday" => Ok(WeekdayCode::Sunday),
            other => Err(EngineError::InvalidRoster {
                message: format!("unknown week-day code '{}'", other),
            }),
        }
    }
}

impl From<Weekday> for WeekdayCode {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => WeekdayCode::Monday,
            Weekday::Tue => WeekdayCode::Tuesday,
            Weekday::Wed => WeekdayCode::Wednesday,
            Weekday::Thu => WeekdayCode::Thursday,
            Weekday::Fri => WeekdayCode::Friday,
            Weekday::Sat => WeekdayCode::Saturday,
            Weekday::Sun => WeekdayCode::Sunday,
        }
    }
}

impl From<WeekdayCode> for Weekday {
    fn from(code: WeekdayCode) -> Self {
        match code {
            WeekdayCode::Monday => Weekday::Mon,
            WeekdayCode::Tuesday => Weekday::Tue,
            WeekdayCode::Wednesday => Weekday::Wed,
            WeekdayCode::Thursday => Weekday::Thu,
            WeekdayCode::Friday => Weekday::Fri,
            WeekdayCode::Saturday => Weekday::Sat,
            WeekdayCode::Sunday => Weekday::Sun,
        }
    }
}

/// The set of week days an employee works.
///
/// Defaults to Monday through Friday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingDays(BTreeSet<WeekdayCode>);

impl WorkingDays {
    /// Creates a working-day set from the given codes.
    pub fn new(codes: impl IntoIterator<Item = WeekdayCode>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// Parses a list of textual week-day codes such as `["ma", "di"]`.
    pub fn parse<S: AsRef<str>>(codes: &[S]) -> EngineResult<Self> {
        codes
            .iter()
            .map(|c| c.as_ref().parse::<WeekdayCode>())
            .collect::<EngineResult<BTreeSet<_>>>()
            .map(Self)
    }

    /// Returns true if the given date falls on a working day.
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.0.contains(&WeekdayCode::from(date.weekday()))
    }

    /// Returns the number of working days per week.
    pub fn days_per_week(&self) -> usize {
        self.0.len()
    }

    /// Iterates the codes in week order.
    pub fn iter(&self) -> impl Iterator<Item = WeekdayCode> + '_ {
        self.0.iter().copied()
    }
}

impl Default for WorkingDays {
    fn default() -> Self {
        Self::new([
            WeekdayCode::Monday,
            WeekdayCode::Tuesday,
            WeekdayCode::Wednesday,
            WeekdayCode::Thursday,
            WeekdayCode::Friday,
        ])
    }
}

/// An unpaid break within the roster day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    /// The start time of the break.
    pub start: NaiveTime,
    /// The end time of the break.
    pub end: NaiveTime,
}

impl BreakWindow {
    /// Returns the number of seconds this break overlaps `[start, end)`.
    pub fn overlap_seconds(&self, start: NaiveTime, end: NaiveTime) -> i64 {
        let from = self.start.max(start);
        let to = self.end.min(end);
        if to > from {
            (to - from).num_seconds()
        } else {
            0
        }
    }
}

/// The organization's standard working-hours template.
///
/// A `RosterTemplate` can only be constructed through [`RosterTemplate::new`],
/// which enforces `day_end > day_start` and that every break lies within the
/// day, is non-empty, and does not overlap another break.
///
/// # Example
///
/// ```
/// use leave_engine::models::{BreakWindow, RosterTemplate};
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let roster = RosterTemplate::new(
///     t(8, 0),
///     t(17, 0),
///     vec![BreakWindow { start: t(12, 0), end: t(12, 30) }],
/// )
/// .unwrap();
/// assert_eq!(roster.net_day_minutes(), 510);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterTemplate {
    day_start: NaiveTime,
    day_end: NaiveTime,
    breaks: Vec<BreakWindow>,
}

impl RosterTemplate {
    /// Creates a validated roster. Breaks are sorted by start time.
    pub fn new(
        day_start: NaiveTime,
        day_end: NaiveTime,
        mut breaks: Vec<BreakWindow>,
    ) -> EngineResult<Self> {
        if day_end <= day_start {
            return Err(EngineError::InvalidRoster {
                message: format!(
                    "day end {} must be after day start {}",
                    day_end, day_start
                ),
            });
        }

        breaks.sort_by_key(|b| b.start);

        for window in &breaks {
            if window.end <= window.start {
                return Err(EngineError::InvalidRoster {
                    message: format!(
                        "break {}-{} must end after it starts",
                        window.start, window.end
                    ),
                });
            }
            if window.start < day_start || window.end > day_end {
                return Err(EngineError::InvalidRoster {
                    message: format!(
                        "break {}-{} lies outside the roster day {}-{}",
                        window.start, window.end, day_start, day_end
                    ),
                });
            }
        }

        if let Some(pair) = breaks.windows(2).find(|pair| pair[1].start < pair[0].end) {
            return Err(EngineError::InvalidRoster {
                message: format!(
                    "break {}-{} overlaps break {}-{}",
                    pair[1].start, pair[1].end, pair[0].start, pair[0].end
                ),
            });
        }

        Ok(Self {
            day_start,
            day_end,
            breaks,
        })
    }

    /// Returns the start of the working day.
    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    /// Returns the end of the working day.
    pub fn day_end(&self) -> NaiveTime {
        self.day_end
    }

    /// Returns the break windows, ordered by start time.
    pub fn breaks(&self) -> &[BreakWindow] {
        &self.breaks
    }

    /// Clamps a time-of-day into `[day_start, day_end]`.
    pub fn clamp(&self, time: NaiveTime) -> NaiveTime {
        time.clamp(self.day_start, self.day_end)
    }

    /// Returns the total break seconds overlapping `[start, end)`.
    pub fn break_seconds_within(&self, start: NaiveTime, end: NaiveTime) -> i64 {
        self.breaks
            .iter()
            .map(|b| b.overlap_seconds(start, end))
            .sum()
    }

    /// Returns the net working minutes of a full roster day.
    pub fn net_day_minutes(&self) -> i64 {
        let gross = (self.day_end - self.day_start).num_seconds();
        (gross - self.break_seconds_within(self.day_start, self.day_end)) / 60
    }
}
