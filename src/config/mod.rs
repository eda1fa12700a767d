//! Configuration loading and the roster provider.
//!
//! This module provides functionality to load engine settings and the
//! organization's roster from YAML files, and to normalize the raw roster
//! into a validated [`RosterTemplate`](crate::models::RosterTemplate).
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Roster: {:?}", config.roster().unwrap());
//! ```

mod loader;
mod roster;
mod types;

pub use loader::ConfigLoader;
pub use roster::{RosterProvider, normalize_roster, parse_time_of_day};
pub use types::{BreakSettings, CalculationSettings, EngineSettings, RosterSettings};
