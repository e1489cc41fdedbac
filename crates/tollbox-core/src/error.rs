// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tollbox cost-metering library.

use thiserror::Error;

/// The primary error type used across the Tollbox workspace.
///
/// The cost-tracking surface is deliberately hard to kill: missing pricing
/// and absent inputs are handled in place (zero-cost breakdowns, no-ops),
/// so the only error the ledger ever hands back to callers is an
/// unsupported export format.
#[derive(Debug, Error)]
pub enum TollboxError {
    /// Configuration errors (invalid TOML, missing required fields, values
    /// that fail post-deserialization validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Requested report format is not supported by the exporter.
    #[error("unsupported report format: {format}")]
    UnsupportedFormat { format: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
