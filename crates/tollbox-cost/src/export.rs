// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report export for a time-filtered slice of ledger history.
//!
//! CSV and JSON are supported; anything else is a hard
//! `TollboxError::UnsupportedFormat`. Costs are formatted to 4 decimal
//! places and timestamps to RFC 3339 so reports round-trip through
//! spreadsheet tooling.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};
use tollbox_core::TollboxError;

use crate::ledger::{CostLedger, CostRecord};

/// Supported report formats. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    Csv,
    Json,
}

/// One exported row; the same fields in both formats.
#[derive(Debug, Serialize)]
struct ReportRow {
    timestamp: String,
    request_id: String,
    operation: String,
    model: String,
    provider: String,
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
    cost: String,
}

impl From<&CostRecord> for ReportRow {
    fn from(record: &CostRecord) -> Self {
        Self {
            timestamp: record.timestamp.to_rfc3339(),
            request_id: record.request_id.clone(),
            operation: record.operation.clone(),
            model: record.model.clone(),
            provider: record.provider.clone(),
            prompt_tokens: record.usage.prompt_tokens,
            completion_tokens: record.usage.completion_tokens,
            total_tokens: record.usage.total_tokens,
            cost: format!("{:.4}", record.cost.total_cost),
        }
    }
}

const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "request_id",
    "operation",
    "model",
    "provider",
    "prompt_tokens",
    "completion_tokens",
    "total_tokens",
    "cost",
];

impl CostLedger {
    /// Serialize all records at or after `since` in the requested format.
    pub fn export(&self, since: DateTime<Utc>, format: &str) -> Result<String, TollboxError> {
        self.export_filtered(since, &HashMap::new(), format)
    }

    /// Like [`CostLedger::export`], restricted to records that satisfy every
    /// filter entry (same keys as `total_since`: `model`, `provider`,
    /// `operation`, or a tag name).
    pub fn export_filtered(
        &self,
        since: DateTime<Utc>,
        filters: &HashMap<String, String>,
        format: &str,
    ) -> Result<String, TollboxError> {
        let format = ReportFormat::from_str(format).map_err(|_| {
            TollboxError::UnsupportedFormat {
                format: format.to_string(),
            }
        })?;

        let rows: Vec<ReportRow> = {
            let state = self.read();
            state
                .history
                .iter()
                .filter(|r| r.timestamp >= since && r.matches(filters))
                .map(ReportRow::from)
                .collect()
        };

        match format {
            ReportFormat::Csv => export_csv(&rows),
            ReportFormat::Json => serde_json::to_string_pretty(&rows)
                .map_err(|e| TollboxError::Internal(e.to_string())),
        }
    }
}

/// Write the header explicitly so an empty report still carries one.
fn export_csv(rows: &[ReportRow]) -> Result<String, TollboxError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| TollboxError::Internal(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| TollboxError::Internal(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TollboxError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TollboxError::Internal(e.to_string()))
}
