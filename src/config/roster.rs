//! Roster provider.
//!
//! The settings store hands out a raw [`RosterSettings`]; this module turns
//! it into a validated [`RosterTemplate`].

use std::sync::Arc;

use chrono::NaiveTime;

use crate::error::{EngineError, EngineResult};
use crate::models::{BreakWindow, RosterTemplate};
use crate::store::SettingsReader;

use super::types::RosterSettings;

/// Parses a time-of-day in `HH:MM` or `HH:MM:SS` form.
///
/// # Example
///
/// ```
/// use leave_engine::config::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time_of_day("08:30").unwrap(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
/// assert!(parse_time_of_day("25:00").is_err());
/// ```
pub fn parse_time_of_day(value: &str) -> EngineResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| EngineError::InvalidRoster {
            message: format!("invalid time of day '{}': {}", value, e),
        })
}

/// Normalizes raw roster settings into a validated template.
pub fn normalize_roster(settings: &RosterSettings) -> EngineResult<RosterTemplate> {
    let breaks = settings
        .breaks
        .iter()
        .map(|b| {
            Ok(BreakWindow {
                start: parse_time_of_day(&b.start)?,
                end: parse_time_of_day(&b.end)?,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    RosterTemplate::new(
        parse_time_of_day(&settings.day_start)?,
        parse_time_of_day(&settings.day_end)?,
        breaks,
    )
}

/// Supplies the organization's roster template.
///
/// Every call to [`RosterProvider::get_roster`] reads the settings store
/// again; callers fetch once per top-level operation.
#[derive(Clone)]
pub struct RosterProvider {
    settings: Arc<dyn SettingsReader>,
}

impl RosterProvider {
    /// Creates a provider backed by a settings reader.
    pub fn new(settings: Arc<dyn SettingsReader>) -> Self {
        Self { settings }
    }

    /// Fetches and normalizes the current roster.
    pub fn get_roster(&self) -> EngineResult<RosterTemplate> {
        normalize_roster(&self.settings.roster_settings()?)
    }

    /// Returns the configured duration rounding increment.
    pub fn rounding_minutes(&self) -> EngineResult<u32> {
        self.settings.rounding_minutes()
    }
}

impl std::fmt::Debug for RosterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterProvider").finish_non_exhaustive()
    }
}
