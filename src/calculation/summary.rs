//! Ledger aggregation.
//!
//! Pure functions that fold ledger entries into a [`BalanceSummary`] or a
//! cached [`BalanceSnapshot`]. A carryover entry for year `Y` supersedes the
//! entries for earlier years written before it, so live balances only look at
//! the open window starting at the latest carryover.

use crate::models::{BalanceSnapshot, BalanceSummary, EntryType, LedgerEntry};

/// Folds entries into per-type totals.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::summarize;
/// use leave_engine::models::LedgerEntry;
///
/// let summary = summarize(&Vec::<LedgerEntry>::new());
/// assert_eq!(summary.total, 0);
/// ```
pub fn summarize<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> BalanceSummary {
    let mut summary = BalanceSummary::default();
    for entry in entries {
        let amount = entry.amount_minutes;
        match entry.entry_type {
            EntryType::Accrual => summary.accrued += amount,
            EntryType::Taken => summary.taken += amount,
            EntryType::Adjustment => summary.adjustments += amount,
            EntryType::Carryover => summary.carryover += amount,
        }
        summary.total += amount;
    }
    summary
}

/// Returns the partition of entries attributed to `year`: its monthly
/// accruals, its own opening carryover, adjustments keyed to the year and
/// leave whose request started in the year.
///
/// The `total` of the result is the year's closing balance.
pub fn year_breakdown(entries: &[LedgerEntry], year: i32) -> BalanceSummary {
    summarize(entries.iter().filter(|e| e.attributed_year() == year))
}

/// Returns the current carryover entry, if any.
///
/// Roll-forward keeps a single carryover entry per employee; if several are
/// present the latest year wins.
fn current_carryover(entries: &[LedgerEntry]) -> Option<&LedgerEntry> {
    entries
        .iter()
        .filter(|e| e.entry_type == EntryType::Carryover)
        .max_by_key(|e| e.attributed_year())
}

/// Leave taken or adjusted against a year before `carryover`'s, written
/// after the carryover was. The carryover does not include it, so it stays
/// live.
fn is_late_entry(entry: &LedgerEntry, carryover: &LedgerEntry) -> bool {
    matches!(entry.entry_type, EntryType::Taken | EntryType::Adjustment)
        && entry.attributed_year() < carryover.attributed_year()
        && entry.created_at > carryover.created_at
}

/// Returns the entries that make up the live balance.
///
/// With a carryover for year `Y`, that is the carryover, everything
/// attributed to `Y` or later, and late `TAKEN`/`ADJUSTMENT` entries for
/// earlier years written after the carryover. Without one, every entry is
/// live.
pub fn open_balance_entries(entries: &[LedgerEntry]) -> Vec<&LedgerEntry> {
    match current_carryover(entries) {
        Some(carryover) => {
            let year = carryover.attributed_year();
            entries
                .iter()
                .filter(|e| e.attributed_year() >= year || is_late_entry(e, carryover))
                .collect()
        }
        None => entries.iter().collect(),
    }
}

/// Returns the closing balance of `year` as roll-forward carries it: the
/// [`year_breakdown`] of `year` plus late entries for earlier years written
/// after `year`'s own carryover.
pub fn closing_balance(entries: &[LedgerEntry], year: i32) -> BalanceSummary {
    let carryover = entries
        .iter()
        .find(|e| e.entry_type == EntryType::Carryover && e.attributed_year() == year);
    summarize(entries.iter().filter(|e| {
        e.attributed_year() == year || carryover.is_some_and(|c| is_late_entry(e, c))
    }))
}

/// Derives the cached bucket snapshot from the ledger.
///
/// The carryover bucket is the sum of live `CARRYOVER` entries. The
/// remainder fills the legal bucket up to `statutory_cap_minutes` and spills
/// into the non-legal bucket; a negative remainder sits in the legal bucket.
/// The bucket total always equals the live ledger total.
pub fn snapshot_from_entries(
    entries: &[LedgerEntry],
    statutory_cap_minutes: i64,
) -> BalanceSnapshot {
    let live = summarize(open_balance_entries(entries));
    let remainder = live.total - live.carryover;
    let legal = if remainder > 0 {
        remainder.min(statutory_cap_minutes.max(0))
    } else {
        remainder
    };

    BalanceSnapshot {
        legal_minutes: legal,
        non_legal_minutes: remainder - legal,
        carryover_minutes: live.carryover,
    }
}
