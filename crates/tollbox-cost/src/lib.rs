// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost metering for LLM provider calls.
//!
//! This crate provides:
//! - **Pricing catalog**: per-model prices with provider-level fallbacks
//! - **Cost calculator**: pure usage-to-cost computation
//! - **Cost ledger**: concurrency-safe append-only history with rolling
//!   daily/weekly/monthly running totals
//! - **Budget monitor**: 80% soft-threshold notifications on the track path
//! - **Report exporter**: CSV/JSON serialization of a time-filtered slice

pub mod budget;
pub mod calculator;
pub mod export;
pub mod ledger;
pub mod pricing;

pub use budget::{BudgetCallback, BudgetLimits, BudgetPeriod, SOFT_THRESHOLD_RATIO};
pub use calculator::{calculate, CostBreakdown};
pub use export::ReportFormat;
pub use ledger::{CallMetadata, CostLedger, CostRecord, HIGH_COST_WARN_USD};
pub use pricing::{PricingCatalog, PricingEntry};
