// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing catalog.
//!
//! Prices are expressed in currency units per 1000 tokens. The catalog maps
//! `(provider, model)` pairs to pricing entries and carries an optional
//! per-provider default used when a model has no entry of its own, so cost
//! tracking never silently drops records for newly released models.
//!
//! Built-in prices verified from the Anthropic and OpenAI pricing pages on
//! 2026-03-01.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pricing for one `(provider, model)` pair, per 1000 tokens.
///
/// A price of zero is a valid free tier and is distinct from an absent
/// entry. `cached_per_1k` / `reasoning_per_1k` being `None` means the model
/// bills those tokens at no separate rate, not that they are free prompt
/// tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    /// Provider identifier (e.g., "anthropic", "openai").
    pub provider: String,
    /// Model identifier (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Cost per 1000 prompt tokens.
    pub prompt_per_1k: f64,
    /// Cost per 1000 completion tokens.
    pub completion_per_1k: f64,
    /// Cost per 1000 cache-read tokens, if the model has a cache discount.
    pub cached_per_1k: Option<f64>,
    /// Cost per 1000 reasoning tokens, if billed separately.
    pub reasoning_per_1k: Option<f64>,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Date this price took effect (informational only; the catalog keeps
    /// one current entry per model).
    pub effective_date: String,
}

impl PricingEntry {
    /// Create an entry with prompt and completion prices in USD.
    pub fn new(provider: &str, model: &str, prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            prompt_per_1k,
            completion_per_1k,
            cached_per_1k: None,
            reasoning_per_1k: None,
            currency: "USD".to_string(),
            effective_date: BUILTIN_EFFECTIVE_DATE.to_string(),
        }
    }

    /// Set the cache-read price per 1000 tokens.
    pub fn with_cached(mut self, cached_per_1k: f64) -> Self {
        self.cached_per_1k = Some(cached_per_1k);
        self
    }

    /// Set the reasoning price per 1000 tokens.
    pub fn with_reasoning(mut self, reasoning_per_1k: f64) -> Self {
        self.reasoning_per_1k = Some(reasoning_per_1k);
        self
    }
}

/// Effective date stamped on the built-in price table.
const BUILTIN_EFFECTIVE_DATE: &str = "2026-03-01";

/// Read-only catalog of model prices with provider-level fallbacks.
///
/// Loaded once at startup; no dynamic reload. Lookups never mutate state.
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
    entries: HashMap<(String, String), PricingEntry>,
    provider_defaults: HashMap<String, PricingEntry>,
}

impl PricingCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with the built-in price table.
    ///
    /// Anthropic cache reads are billed at 10% of the input price. OpenAI
    /// reasoning tokens are billed at the completion rate.
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            PricingEntry::new("anthropic", "claude-opus-4-20250514", 0.015, 0.075)
                .with_cached(0.0015),
        );
        catalog.insert(
            PricingEntry::new("anthropic", "claude-sonnet-4-20250514", 0.003, 0.015)
                .with_cached(0.0003),
        );
        catalog.insert(
            PricingEntry::new("anthropic", "claude-haiku-4-5-20250901", 0.0008, 0.004)
                .with_cached(0.00008),
        );

        catalog.insert(PricingEntry::new("openai", "gpt-4o", 0.0025, 0.01).with_cached(0.00125));
        catalog.insert(
            PricingEntry::new("openai", "gpt-4o-mini", 0.00015, 0.0006).with_cached(0.000075),
        );
        catalog.insert(
            PricingEntry::new("openai", "o1", 0.015, 0.06)
                .with_cached(0.0075)
                .with_reasoning(0.06),
        );

        // Unknown models fall back to the mid-tier price of their provider.
        catalog.set_provider_default(
            PricingEntry::new("anthropic", "default", 0.003, 0.015).with_cached(0.0003),
        );
        catalog
            .set_provider_default(PricingEntry::new("openai", "default", 0.0025, 0.01));

        catalog
    }

    /// Add or replace the entry for an entry's `(provider, model)` pair.
    pub fn insert(&mut self, entry: PricingEntry) {
        self.entries
            .insert((entry.provider.clone(), entry.model.clone()), entry);
    }

    /// Set the fallback entry used for a provider's unknown models.
    pub fn set_provider_default(&mut self, entry: PricingEntry) {
        self.provider_defaults.insert(entry.provider.clone(), entry);
    }

    /// Look up the current entry for a `(provider, model)` pair.
    pub fn lookup(&self, model: &str, provider: &str) -> Option<&PricingEntry> {
        self.entries
            .get(&(provider.to_string(), model.to_string()))
    }

    /// Fallback entry for a provider, if one is configured.
    pub fn default_for(&self, provider: &str) -> Option<&PricingEntry> {
        self.provider_defaults.get(provider)
    }
}
