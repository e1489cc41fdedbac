// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tollbox cost-metering workspace.
//!
//! This crate provides the error type and the shared value types consumed by
//! the pricing, ledger, and configuration crates.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TollboxError;
pub use types::UsageSnapshot;
