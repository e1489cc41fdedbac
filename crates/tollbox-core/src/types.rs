// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common value types shared across the Tollbox workspace.

use serde::{Deserialize, Serialize};

/// Token counts reported for one completed LLM provider call.
///
/// Produced by the host application from the raw provider response; Tollbox
/// treats it as an immutable input. Cached and reasoning counts are zero for
/// providers that do not report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Number of prompt (input) tokens.
    pub prompt_tokens: u64,
    /// Number of completion (output) tokens.
    pub completion_tokens: u64,
    /// Number of tokens served from the provider's prompt cache.
    pub cached_tokens: u64,
    /// Number of internal reasoning tokens billed by the provider.
    pub reasoning_tokens: u64,
    /// Total tokens as reported by the provider.
    pub total_tokens: u64,
}

impl UsageSnapshot {
    /// Create a snapshot from prompt and completion counts alone.
    ///
    /// `total_tokens` is derived; cached and reasoning counts start at zero.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            cached_tokens: 0,
            reasoning_tokens: 0,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
