//! Configuration types for the leave engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};

use crate::models::DeductionPolicy;

/// A break window as written in settings (`"12:00"` style strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSettings {
    /// Start time-of-day.
    pub start: String,
    /// End time-of-day.
    pub end: String,
}

/// The raw working-hours template from roster.yaml.
///
/// Normalized into a [`RosterTemplate`](crate::models::RosterTemplate) by the
/// [`RosterProvider`](super::RosterProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    /// Start of the working day.
    pub day_start: String,
    /// End of the working day.
    pub day_end: String,
    /// Unpaid breaks within the day.
    #[serde(default)]
    pub breaks: Vec<BreakSettings>,
}

fn default_rounding_minutes() -> u32 {
    15
}

/// Calculation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSettings {
    /// Leave durations are rounded to the nearest multiple of this many
    /// minutes; values of 0 or 1 round to the nearest minute.
    #[serde(default = "default_rounding_minutes")]
    pub rounding_minutes: u32,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            rounding_minutes: default_rounding_minutes(),
        }
    }
}

/// Engine settings from engine.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Calculation settings.
    #[serde(default)]
    pub calculation: CalculationSettings,
    /// Default bucket order for deductions.
    #[serde(default)]
    pub deduction_policy: DeductionPolicy,
}
