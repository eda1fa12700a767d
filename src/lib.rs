//! Leave Accrual & Ledger Engine
//!
//! This crate tracks employee leave as an append-only ledger of signed minute
//! amounts. It computes how many working minutes a leave request covers,
//! accrues the annual entitlement month by month, rolls each year's closing
//! balance forward as the next year's carryover, deducts leave across
//! balance buckets and keeps a cached per-bucket balance in step with the
//! ledger.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
