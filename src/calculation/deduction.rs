//! Deduction across balance buckets.
//!
//! A requested number of minutes is converted to hours (two decimals) and
//! drawn from the buckets in the order given by a [`DeductionPolicy`].
//! Buckets that disallow negative balances give at most what they hold;
//! a bucket that allows negative balances absorbs everything still
//! outstanding. The walk never fails: whatever no bucket could take is
//! reported as unapplied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{BalanceSnapshot, Bucket, DeductionPolicy, hours_to_minutes, minutes_to_hours};

/// Hours drawn from one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDraw {
    /// The bucket drawn from.
    pub bucket: Bucket,
    /// Hours taken from the bucket.
    pub hours: Decimal,
}

/// The result of applying a deduction to a balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionOutcome {
    /// The updated bucket balances.
    pub balance: BalanceSnapshot,
    /// Draws in walk order; buckets that gave nothing are omitted.
    pub draws: Vec<BucketDraw>,
    /// Hours no bucket could absorb.
    pub unapplied_hours: Decimal,
}

/// Applies a deduction of `requested_minutes` to `balance`.
///
/// # Errors
///
/// Returns `CalculationError` if `requested_minutes` is negative.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::apply_deduction;
/// use leave_engine::models::{BalanceSnapshot, DeductionPolicy};
///
/// let balance = BalanceSnapshot {
///     legal_minutes: 0,
///     non_legal_minutes: 30,
///     carryover_minutes: 60,
/// };
/// let outcome = apply_deduction(&balance, 150, &DeductionPolicy::default()).unwrap();
/// assert_eq!(outcome.balance.carryover_minutes, 0);
/// assert_eq!(outcome.balance.non_legal_minutes, 0);
/// assert_eq!(outcome.balance.legal_minutes, -60);
/// ```
pub fn apply_deduction(
    balance: &BalanceSnapshot,
    requested_minutes: i64,
    policy: &DeductionPolicy,
) -> EngineResult<DeductionOutcome> {
    if requested_minutes < 0 {
        return Err(EngineError::CalculationError {
            message: format!("cannot deduct a negative amount ({} minutes)", requested_minutes),
        });
    }

    let mut updated = *balance;
    let mut remaining = minutes_to_hours(requested_minutes);
    let mut draws = Vec::new();

    for rule in policy.rules() {
        if remaining <= Decimal::ZERO {
            break;
        }

        let current = updated.hours(rule.bucket);
        let take = if rule.allow_negative {
            remaining
        } else {
            remaining.min(current.max(Decimal::ZERO))
        };

        if take > Decimal::ZERO {
            let mut next = current - take;
            if !rule.allow_negative && next < Decimal::ZERO {
                next = Decimal::ZERO;
            }
            updated.set_minutes(rule.bucket, hours_to_minutes(next));
            draws.push(BucketDraw {
                bucket: rule.bucket,
                hours: take,
            });
            remaining -= take;
        }
    }

    Ok(DeductionOutcome {
        balance: updated,
        draws,
        unapplied_hours: remaining.max(Decimal::ZERO),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BucketRule;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot(carryover: i64, non_legal: i64, legal: i64) -> BalanceSnapshot {
        BalanceSnapshot {
            legal_minutes: legal,
            non_legal_minutes: non_legal,
            carryover_minutes: carryover,
        }
    }

    fn no_negatives() -> DeductionPolicy {
        DeductionPolicy::new(vec![
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
                allow_negative: false,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_ordering_with_legal_negative() {
        // carryover 1h, non-legal 0.5h, legal 0; deduct 2h
        let outcome =
            apply_deduction(&snapshot(60, 30, 0), 120, &DeductionPolicy::default()).unwrap();
        assert_eq!(outcome.balance.hours(Bucket::Carryover), dec("0"));
        assert_eq!(outcome.balance.hours(Bucket::NonLegal), dec("0"));
        assert_eq!(outcome.balance.hours(Bucket::Legal), dec("-0.5"));
        assert_eq!(
            outcome.draws,
            vec![
                BucketDraw {
                    bucket: Bucket::Carryover,
                    hours: dec("1")
                },
                BucketDraw {
                    bucket: Bucket::NonLegal,
                    hours: dec("0.5")
                },
                BucketDraw {
                    bucket: Bucket::Legal,
                    hours: dec("0.5")
                },
            ]
        );
        assert_eq!(outcome.unapplied_hours, Decimal::ZERO);
    }

    #[test]
    fn test_ordering_leaves_legal_minus_one_hour() {
        let outcome =
            apply_deduction(&snapshot(60, 30, 0), 150, &DeductionPolicy::default()).unwrap();
        assert_eq!(outcome.balance, snapshot(0, 0, -60));
    }

    #[test]
    fn test_stops_once_satisfied() {
        let outcome =
            apply_deduction(&snapshot(600, 600, 600), 90, &DeductionPolicy::default()).unwrap();
        assert_eq!(outcome.balance, snapshot(510, 600, 600));
        assert_eq!(outcome.draws.len(), 1);
    }

    #[test]
    fn test_insufficient_balance_is_dropped_silently() {
        let outcome = apply_deduction(&snapshot(60, 60, 60), 300, &no_negatives()).unwrap();
        assert_eq!(outcome.balance, snapshot(0, 0, 0));
        assert_eq!(outcome.unapplied_hours, dec("2"));
    }

    #[test]
    fn test_negative_disallowed_bucket_is_left_alone() {
        let outcome = apply_deduction(&snapshot(-30, 120, 0), 60, &no_negatives()).unwrap();
        assert_eq!(outcome.balance, snapshot(-30, 60, 0));
    }

    #[test]
    fn test_bucket_missing_from_policy_is_untouched() {
        let policy = DeductionPolicy::new(vec![BucketRule {
            bucket: Bucket::Legal,
            allow_negative: true,
        }])
        .unwrap();
        let outcome = apply_deduction(&snapshot(600, 600, 0), 120, &policy).unwrap();
        assert_eq!(outcome.balance, snapshot(600, 600, -120));
    }

    #[test]
    fn test_zero_request_changes_nothing() {
        let balance = snapshot(10, 20, 30);
        let outcome = apply_deduction(&balance, 0, &DeductionPolicy::default()).unwrap();
        assert_eq!(outcome.balance, balance);
        assert!(outcome.draws.is_empty());
    }

    #[test]
    fn test_negative_request_is_rejected() {
        let result = apply_deduction(&snapshot(0, 0, 0), -5, &DeductionPolicy::default());
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_odd_minutes_survive_hour_conversion() {
        // 7 minutes is 0.12h; the walk in hours must still land on whole minutes
        let outcome =
            apply_deduction(&snapshot(5, 0, 100), 7, &DeductionPolicy::default()).unwrap();
        assert_eq!(outcome.balance.carryover_minutes, 0);
        assert_eq!(outcome.balance.legal_minutes, 98);
    }
}
