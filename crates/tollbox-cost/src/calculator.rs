// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure cost calculation from a usage snapshot and a pricing entry.
//!
//! Formula: each component is `tokens * price_per_1k / 1000`. Cached and
//! reasoning components are computed only when the model has a positive
//! price for them; an absent price means those tokens carry no separate
//! rate and contribute exactly zero. No rounding is applied here; rounding
//! is a presentation concern.

use serde::{Deserialize, Serialize};
use tollbox_core::UsageSnapshot;
use tracing::warn;

use crate::pricing::PricingCatalog;

/// Currency used when no pricing entry is available.
const DEFAULT_CURRENCY: &str = "USD";

/// Itemized cost of one LLM call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Cost of prompt tokens.
    pub prompt_cost: f64,
    /// Cost of completion tokens.
    pub completion_cost: f64,
    /// Cost of cache-read tokens (zero when the model has no cache rate).
    pub cached_cost: f64,
    /// Cost of reasoning tokens (zero when the model has no reasoning rate).
    pub reasoning_cost: f64,
    /// Sum of the four components.
    pub total_cost: f64,
    /// Currency copied from the pricing entry used.
    pub currency: String,
}

impl CostBreakdown {
    /// A breakdown with every component at zero, in the default currency.
    ///
    /// Used when no pricing entry exists for a call; the call is still
    /// tracked so request counts and token totals stay complete.
    pub fn zero() -> Self {
        Self {
            prompt_cost: 0.0,
            completion_cost: 0.0,
            cached_cost: 0.0,
            reasoning_cost: 0.0,
            total_cost: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Calculate the cost of one call from its usage snapshot.
///
/// Returns `None` when `usage` is absent (a failed call reported no usage;
/// there is nothing to cost). A catalog miss falls back to the provider
/// default; when that is also absent the result is a zero-cost breakdown
/// and a logged warning, never an error.
pub fn calculate(
    usage: Option<&UsageSnapshot>,
    model: &str,
    provider: &str,
    catalog: &PricingCatalog,
) -> Option<CostBreakdown> {
    let usage = usage?;

    let Some(entry) = catalog
        .lookup(model, provider)
        .or_else(|| catalog.default_for(provider))
    else {
        warn!(model, provider, "no pricing entry or provider default, recording zero cost");
        return Some(CostBreakdown::zero());
    };

    let prompt_cost = usage.prompt_tokens as f64 * entry.prompt_per_1k / 1000.0;
    let completion_cost = usage.completion_tokens as f64 * entry.completion_per_1k / 1000.0;

    let cached_cost = match entry.cached_per_1k {
        Some(price) if price > 0.0 && usage.cached_tokens > 0 => {
            usage.cached_tokens as f64 * price / 1000.0
        }
        _ => 0.0,
    };
    let reasoning_cost = match entry.reasoning_per_1k {
        Some(price) if price > 0.0 && usage.reasoning_tokens > 0 => {
            usage.reasoning_tokens as f64 * price / 1000.0
        }
        _ => 0.0,
    };

    Some(CostBreakdown {
        prompt_cost,
        completion_cost,
        cached_cost,
        reasoning_cost,
        total_cost: prompt_cost + completion_cost + cached_cost + reasoning_cost,
        currency: entry.currency.clone(),
    })
}
