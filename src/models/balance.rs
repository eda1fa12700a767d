//! Balance models: the cached bucket snapshot, the reporting summary and
//! the deduction policy.
//!
//! The ledger stores integer minutes only. Conversion to fractional hours
//! happens here, at the display/cache boundary, with two-decimal precision.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Converts minutes to hours rounded to two decimals.
///
/// # Example
///
/// ```
/// use leave_engine::models::minutes_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(minutes_to_hours(90), Decimal::new(150, 2));
/// assert_eq!(minutes_to_hours(20), Decimal::new(33, 2));
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

/// Converts hours to whole minutes, rounding to the nearest minute.
///
/// Hours produced by [`minutes_to_hours`] convert back to the original
/// minute count.
pub fn hours_to_minutes(hours: Decimal) -> i64 {
    (hours * Decimal::from(60)).round().to_i64().unwrap_or(0)
}

/// One of the three balance categories a deduction walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Balance carried over from the previous year.
    Carryover,
    /// Extra (non-statutory) leave.
    NonLegal,
    /// Statutory leave.
    Legal,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Carryover => write!(f, "carryover"),
            Bucket::NonLegal => write!(f, "non_legal"),
            Bucket::Legal => write!(f, "legal"),
        }
    }
}

/// Denormalized bucket totals, in minutes.
///
/// Always re-derivable from the ledger; see
/// [`snapshot_from_entries`](crate::calculation::snapshot_from_entries).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Statutory leave balance.
    pub legal_minutes: i64,
    /// Extra leave balance.
    pub non_legal_minutes: i64,
    /// Carried-over balance.
    pub carryover_minutes: i64,
}

impl BalanceSnapshot {
    /// Returns the sum of all buckets.
    pub fn total_minutes(&self) -> i64 {
        self.legal_minutes + self.non_legal_minutes + self.carryover_minutes
    }

    /// Returns a bucket's balance in minutes.
    pub fn minutes(&self, bucket: Bucket) -> i64 {
        match bucket {
            Bucket::Carryover => self.carryover_minutes,
            Bucket::NonLegal => self.non_legal_minutes,
            Bucket::Legal => self.legal_minutes,
        }
    }

    /// Returns a bucket's balance in hours (two decimals).
    pub fn hours(&self, bucket: Bucket) -> Decimal {
        minutes_to_hours(self.minutes(bucket))
    }

    /// Sets a bucket's balance in minutes.
    pub fn set_minutes(&mut self, bucket: Bucket, minutes: i64) {
        match bucket {
            Bucket::Carryover => self.carryover_minutes = minutes,
            Bucket::NonLegal => self.non_legal_minutes = minutes,
            Bucket::Legal => self.legal_minutes = minutes,
        }
    }
}

/// Reporting aggregation over ledger entries, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sum of `ACCRUAL` entries.
    pub accrued: i64,
    /// Sum of `TAKEN` entries (zero or negative).
    pub taken: i64,
    /// Sum of `ADJUSTMENT` entries.
    pub adjustments: i64,
    /// Sum of `CARRYOVER` entries.
    pub carryover: i64,
    /// Sum of everything above.
    pub total: i64,
}

/// Per-bucket rule in a deduction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRule {
    /// The bucket to draw from.
    pub bucket: Bucket,
    /// Whether the bucket may go below zero.
    #[serde(default)]
    pub allow_negative: bool,
}

/// Ordered list of buckets a deduction walks.
///
/// # Example
///
/// ```
/// use leave_engine::models::{Bucket, DeductionPolicy};
///
/// let policy = DeductionPolicy::default();
/// let order: Vec<Bucket> = policy.rules().iter().map(|r| r.bucket).collect();
/// assert_eq!(order, vec![Bucket::Carryover, Bucket::NonLegal, Bucket::Legal]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BucketRule>", into = "Vec<BucketRule>")]
pub struct DeductionPolicy {
    rules: Vec<BucketRule>,
}

impl DeductionPolicy {
    /// Creates a policy; each bucket may appear at most once.
    pub fn new(rules: Vec<BucketRule>) -> EngineResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.bucket == rule.bucket) {
                return Err(EngineError::CalculationError {
                    message: format!("bucket '{}' appears twice in deduction policy", rule.bucket),
                });
            }
        }
        Ok(Self { rules })
    }

    /// Returns the rules in walk order.
    pub fn rules(&self) -> &[BucketRule] {
        &self.rules
    }
}

impl Default for DeductionPolicy {
    /// Carryover first, then non-legal, then legal; only legal may go negative.
    fn default() -> Self {
        Self {
            rules: vec![
                BucketRule {
                    bucket: Bucket::Carryover,
                    allow_negative: false,
                },
                BucketRule {
                    bucket: Bucket::NonLegal,
                    allow_negative: false,
                },
                BucketRule {
                    bucket: Bucket::Legal,
                    allow_negative: true,
                },
            ],
        }
    }
}

impl TryFrom<Vec<BucketRule>> for DeductionPolicy {
    type Error = EngineError;

    fn try_from(rules: Vec<BucketRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<DeductionPolicy> for Vec<BucketRule> {
    fn from(policy: DeductionPolicy) -> Self {
        policy.rules
    }
}
