// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory cost ledger with multi-window running totals.
//!
//! Every tracked call is appended to a process-lifetime history list and
//! added to a set of named buckets (`all_time`, `daily_<date>`,
//! `weekly_<isoweek>`, `monthly_<month>`). History is append-only: records
//! are never mutated or evicted, so memory grows with call volume for the
//! life of the process.
//!
//! One `RwLock` serializes access: `track` takes the write lock for the
//! append, the totals update, and the budget check; readers share the read
//! lock and may run concurrently with each other.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tollbox_core::UsageSnapshot;
use tracing::{info, warn};

use crate::budget::{BudgetCallback, BudgetLimits, BudgetMonitor, BudgetPeriod};
use crate::calculator::CostBreakdown;

/// Absolute per-call cost above which a structured warning is logged.
/// Observational only; tracking always proceeds.
pub const HIGH_COST_WARN_USD: f64 = 1.0;

/// Call identity supplied by the host alongside a computed cost.
#[derive(Debug, Clone, Default)]
pub struct CallMetadata {
    /// Request identifier, unique per call.
    pub request_id: String,
    /// Host-level operation that triggered the call (e.g., "extract").
    pub operation: String,
    /// Model identifier used.
    pub model: String,
    /// Provider identifier used.
    pub provider: String,
    /// Token usage reported for the call.
    pub usage: UsageSnapshot,
    /// Free-form string tags for filtered queries.
    pub tags: HashMap<String, String>,
}

/// One tracked call. Created once at track time and immutable thereafter;
/// owned exclusively by the ledger's history list.
#[derive(Debug, Clone, Serialize)]
pub struct CostRecord {
    /// Wall-clock time the call was tracked.
    pub timestamp: DateTime<Utc>,
    /// Request identifier.
    pub request_id: String,
    /// Operation that triggered the call.
    pub operation: String,
    /// Model identifier.
    pub model: String,
    /// Provider identifier.
    pub provider: String,
    /// Token usage for the call.
    pub usage: UsageSnapshot,
    /// Itemized cost.
    pub cost: CostBreakdown,
    /// Tags copied from the call metadata.
    pub tags: HashMap<String, String>,
}

impl CostRecord {
    /// True when the record satisfies every filter entry. The keys `model`,
    /// `provider`, and `operation` match those fields; any other key is an
    /// exact-match tag lookup.
    pub(crate) fn matches(&self, filters: &HashMap<String, String>) -> bool {
        filters.iter().all(|(key, value)| match key.as_str() {
            "model" => self.model == *value,
            "provider" => self.provider == *value,
            "operation" => self.operation == *value,
            tag => self.tags.get(tag).is_some_and(|v| v == value),
        })
    }
}

#[derive(Default)]
pub(crate) struct LedgerState {
    pub(crate) history: Vec<CostRecord>,
    pub(crate) totals: HashMap<String, f64>,
    pub(crate) budget: BudgetMonitor,
}

/// Concurrency-safe accumulator of cost records and running totals.
///
/// An explicit owned object: the host constructs one and hands out
/// references (or an `Arc`) to every caller that reports or queries cost.
#[derive(Default)]
pub struct CostLedger {
    inner: RwLock<LedgerState>,
}

/// Bucket keys credited by one track call at the given instant.
fn bucket_keys(now: DateTime<Utc>) -> [String; 4] {
    [
        "all_time".to_string(),
        BudgetPeriod::Daily.bucket_key(now),
        BudgetPeriod::Weekly.bucket_key(now),
        BudgetPeriod::Monthly.bucket_key(now),
    ]
}

impl CostLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // Ledger state is plain data and remains valid if a caller panicked
    // while holding the lock, so a poisoned guard is recovered rather than
    // surfacing an error to every caller.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record and credit its cost to every active bucket.
    ///
    /// A no-op when either argument is `None` (a failed call reported no
    /// usage, or nothing was costed); call sites are not required to guard.
    /// The budget check runs synchronously in the same call, under the same
    /// write lock.
    pub fn track(&self, cost: Option<CostBreakdown>, metadata: Option<CallMetadata>) {
        let (Some(cost), Some(metadata)) = (cost, metadata) else {
            return;
        };

        let now = Utc::now();
        let record = CostRecord {
            timestamp: now,
            request_id: metadata.request_id,
            operation: metadata.operation,
            model: metadata.model,
            provider: metadata.provider,
            usage: metadata.usage,
            cost,
            tags: metadata.tags,
        };

        let mut state = self.write();
        for key in bucket_keys(now) {
            *state.totals.entry(key).or_insert(0.0) += record.cost.total_cost;
        }

        if record.cost.total_cost > HIGH_COST_WARN_USD {
            warn!(
                request_id = %record.request_id,
                model = %record.model,
                total_cost = record.cost.total_cost,
                "high-cost call tracked"
            );
        }
        info!(
            request_id = %record.request_id,
            operation = %record.operation,
            model = %record.model,
            provider = %record.provider,
            prompt_tokens = record.usage.prompt_tokens,
            completion_tokens = record.usage.completion_tokens,
            total_cost = record.cost.total_cost,
            "cost recorded"
        );
        state.history.push(record);

        let LedgerState { totals, budget, .. } = &mut *state;
        budget.check(totals, now);
    }

    /// Sum of `total_cost` over records at or after `since` that satisfy
    /// every filter. An empty filter map includes all qualifying records.
    pub fn total_since(&self, since: DateTime<Utc>, filters: &HashMap<String, String>) -> f64 {
        self.read()
            .history
            .iter()
            .filter(|r| r.timestamp >= since && r.matches(filters))
            .map(|r| r.cost.total_cost)
            .sum()
    }

    /// Dimensional spend since `since`: each qualifying record adds its cost
    /// to `model_<model>`, `operation_<operation>`, `provider_<provider>`,
    /// and `total`.
    ///
    /// This is a fan-out, not a partition: a record contributes to exactly
    /// four keys, so the mapping does not sum to `total` across key
    /// families.
    pub fn breakdown_since(&self, since: DateTime<Utc>) -> HashMap<String, f64> {
        let state = self.read();
        let mut breakdown: HashMap<String, f64> = HashMap::new();
        // `total` is always present, so it equals `total_since` even when no
        // record qualifies.
        breakdown.insert("total".to_string(), 0.0);
        for record in state.history.iter().filter(|r| r.timestamp >= since) {
            let cost = record.cost.total_cost;
            *breakdown.entry(format!("model_{}", record.model)).or_insert(0.0) += cost;
            *breakdown
                .entry(format!("operation_{}", record.operation))
                .or_insert(0.0) += cost;
            *breakdown
                .entry(format!("provider_{}", record.provider))
                .or_insert(0.0) += cost;
            *breakdown.entry("total".to_string()).or_insert(0.0) += cost;
        }
        breakdown
    }

    /// Configure budget limits and the notification callback.
    pub fn configure_budget(&self, limits: BudgetLimits, callback: BudgetCallback) {
        self.write().budget.configure(limits, callback);
    }

    /// Running total for a named bucket (0 when the bucket does not exist).
    pub fn bucket_total(&self, key: &str) -> f64 {
        self.read().totals.get(key).copied().unwrap_or(0.0)
    }

    /// Number of records tracked so far.
    pub fn record_count(&self) -> usize {
        self.read().history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{calculate, CostBreakdown};
    use crate::pricing::PricingCatalog;
    use std::sync::{Arc, Mutex};

    fn metadata(operation: &str, model: &str, provider: &str) -> CallMetadata {
        CallMetadata {
            request_id: uuid::Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            model: model.to_string(),
            provider: provider.to_string(),
            usage: UsageSnapshot::new(1000, 500),
            tags: HashMap::new(),
        }
    }

    fn sonnet_cost() -> Option<CostBreakdown> {
        // 1000 prompt + 500 completion at $0.003/$0.015 per 1K = $0.0105.
        calculate(
            Some(&UsageSnapshot::new(1000, 500)),
            "claude-sonnet-4-20250514",
            "anthropic",
            &PricingCatalog::with_builtin(),
        )
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn track_is_noop_without_cost_or_metadata() {
        let ledger = CostLedger::new();
        ledger.track(None, Some(metadata("chat", "m", "p")));
        ledger.track(sonnet_cost(), None);
        ledger.track(None, None);
        assert_eq!(ledger.record_count(), 0);
        assert!((ledger.total_since(epoch(), &HashMap::new()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tracked_costs_accumulate() {
        let ledger = CostLedger::new();
        let mut catalog = PricingCatalog::new();
        catalog.insert(crate::pricing::PricingEntry::new("acme", "m1", 0.01, 0.03));
        let usage = UsageSnapshot::new(1000, 500);
        // 1000 * 0.01/1K + 500 * 0.03/1K = 0.010 + 0.015 = 0.025 per call.
        let cost = calculate(Some(&usage), "m1", "acme", &catalog);
        ledger.track(cost.clone(), Some(metadata("chat", "m1", "acme")));
        ledger.track(cost, Some(metadata("chat", "m1", "acme")));

        let total = ledger.total_since(epoch(), &HashMap::new());
        assert!((total - 0.05).abs() < 1e-10, "expected 0.05, got {total}");
    }

    #[test]
    fn track_credits_all_four_buckets() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));

        let now = Utc::now();
        for key in bucket_keys(now) {
            assert!(
                (ledger.bucket_total(&key) - 0.0105).abs() < 1e-10,
                "bucket {key} should hold the tracked cost"
            );
        }
    }

    #[test]
    fn total_since_excludes_future_cutoff() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!((ledger.total_since(future, &HashMap::new()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn operation_filter_excludes_other_operations() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("extract", "m", "p")));
        ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));

        let filters = HashMap::from([("operation".to_string(), "extract".to_string())]);
        let total = ledger.total_since(epoch(), &filters);
        assert!((total - 0.0105).abs() < 1e-10, "expected 0.0105, got {total}");
    }

    #[test]
    fn tag_filter_matches_exactly() {
        let ledger = CostLedger::new();
        let mut tagged = metadata("chat", "m", "p");
        tagged.tags.insert("tenant".to_string(), "acme".to_string());
        ledger.track(sonnet_cost(), Some(tagged));
        ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));

        let filters = HashMap::from([("tenant".to_string(), "acme".to_string())]);
        assert!((ledger.total_since(epoch(), &filters) - 0.0105).abs() < 1e-10);

        let miss = HashMap::from([("tenant".to_string(), "other".to_string())]);
        assert!((ledger.total_since(epoch(), &miss) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_failing_one_of_several_filters_is_excluded() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("extract", "m1", "p")));

        let filters = HashMap::from([
            ("operation".to_string(), "extract".to_string()),
            ("model".to_string(), "m2".to_string()),
        ]);
        assert!((ledger.total_since(epoch(), &filters) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn breakdown_fans_out_to_four_keys_per_record() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("chat", "m1", "acme")));

        let breakdown = ledger.breakdown_since(epoch());
        assert_eq!(breakdown.len(), 4);
        for key in ["model_m1", "operation_chat", "provider_acme", "total"] {
            assert!(
                (breakdown[key] - 0.0105).abs() < 1e-10,
                "key {key} should hold the tracked cost"
            );
        }
    }

    #[test]
    fn breakdown_has_zero_total_when_nothing_qualifies() {
        let ledger = CostLedger::new();
        let breakdown = ledger.breakdown_since(epoch());
        assert!((breakdown["total"] - 0.0).abs() < f64::EPSILON);

        // Same with records present but none at/after the cutoff.
        ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));
        let future = Utc::now() + chrono::Duration::hours(1);
        let breakdown = ledger.breakdown_since(future);
        assert!((breakdown["total"] - 0.0).abs() < f64::EPSILON);
        assert!(
            (breakdown["total"] - ledger.total_since(future, &HashMap::new())).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn breakdown_total_matches_unfiltered_total_since() {
        let ledger = CostLedger::new();
        ledger.track(sonnet_cost(), Some(metadata("chat", "m1", "acme")));
        ledger.track(sonnet_cost(), Some(metadata("extract", "m2", "acme")));
        ledger.track(sonnet_cost(), Some(metadata("chat", "m1", "other")));

        let total = ledger.total_since(epoch(), &HashMap::new());
        let breakdown = ledger.breakdown_since(epoch());
        assert!(
            (breakdown["total"] - total).abs() < 1e-10,
            "breakdown total {} must equal total_since {total}",
            breakdown["total"]
        );
    }

    #[test]
    fn budget_callback_fires_per_track_once_crossed() {
        let ledger = CostLedger::new();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        ledger.configure_budget(
            BudgetLimits {
                daily: Some(1.0),
                ..Default::default()
            },
            Arc::new(move |total, limit, period| {
                sink.lock().unwrap().push((total, limit, period));
            }),
        );

        // 0.405 + 0.405 = 0.81 > 0.8, so the second and every later track fires.
        let mut catalog = PricingCatalog::new();
        catalog.insert(crate::pricing::PricingEntry::new("acme", "m1", 0.27, 0.27));
        let usage = UsageSnapshot::new(1000, 500);
        let cost = calculate(Some(&usage), "m1", "acme", &catalog);

        ledger.track(cost.clone(), Some(metadata("chat", "m1", "acme")));
        assert!(fired.lock().unwrap().is_empty());

        ledger.track(cost.clone(), Some(metadata("chat", "m1", "acme")));
        ledger.track(cost, Some(metadata("chat", "m1", "acme")));

        let calls = fired.lock().unwrap();
        assert_eq!(calls.len(), 2, "alert re-fires on every track once crossed");
        assert_eq!(calls[0].2, BudgetPeriod::Daily);
        assert!((calls[0].1 - 1.0).abs() < 1e-10);
        assert!(calls[0].0 > 0.8);
    }

    #[test]
    fn tracking_continues_past_the_limit() {
        let ledger = CostLedger::new();
        ledger.configure_budget(
            BudgetLimits {
                daily: Some(0.01),
                ..Default::default()
            },
            Arc::new(|_, _, _| {}),
        );

        for _ in 0..5 {
            ledger.track(sonnet_cost(), Some(metadata("chat", "m", "p")));
        }
        assert_eq!(ledger.record_count(), 5);
    }

    #[test]
    fn high_cost_record_is_still_tracked() {
        let ledger = CostLedger::new();
        let cost = CostBreakdown {
            prompt_cost: 2.0,
            completion_cost: 0.5,
            cached_cost: 0.0,
            reasoning_cost: 0.0,
            total_cost: 2.5,
            currency: "USD".to_string(),
        };
        // Above HIGH_COST_WARN_USD: logs a warning, never fails.
        ledger.track(Some(cost), Some(metadata("batch", "m", "p")));
        assert_eq!(ledger.record_count(), 1);
    }
}
