// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget monitoring with daily, weekly, and monthly soft thresholds.
//!
//! The monitor runs inside the ledger's write path: after every tracked
//! record it compares the current period bucket against 80% of the
//! configured limit and invokes the caller-supplied callback when the
//! threshold is exceeded. There is no built-in debouncing: the callback
//! re-fires on every subsequent track once a threshold is crossed. Callers
//! that want rate-limited notification can set `alert_cooldown_secs`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// Fraction of a limit at which notifications begin firing.
pub const SOFT_THRESHOLD_RATIO: f64 = 0.8;

/// A budget accumulation period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    /// All periods, in check order.
    pub const ALL: [BudgetPeriod; 3] =
        [BudgetPeriod::Daily, BudgetPeriod::Weekly, BudgetPeriod::Monthly];

    /// The ledger bucket key for this period at the given instant.
    ///
    /// Weekly buckets use the ISO week (`%G-W%V`), so the ISO year is used
    /// rather than the calendar year around new year boundaries.
    pub fn bucket_key(&self, now: DateTime<Utc>) -> String {
        match self {
            BudgetPeriod::Daily => format!("daily_{}", now.format("%Y-%m-%d")),
            BudgetPeriod::Weekly => format!("weekly_{}", now.format("%G-W%V")),
            BudgetPeriod::Monthly => format!("monthly_{}", now.format("%Y-%m")),
        }
    }
}

/// Notification invoked with `(current_total, limit, period)` when a period
/// total exceeds its soft threshold.
pub type BudgetCallback = Arc<dyn Fn(f64, f64, BudgetPeriod) + Send + Sync>;

/// Budget ceilings per period. `None` or a non-positive value disables
/// checking for that period.
#[derive(Debug, Clone, Default)]
pub struct BudgetLimits {
    /// Daily spending ceiling.
    pub daily: Option<f64>,
    /// Weekly spending ceiling.
    pub weekly: Option<f64>,
    /// Monthly spending ceiling.
    pub monthly: Option<f64>,
    /// Minimum seconds between notifications per period. `None` re-fires on
    /// every track, matching the default behavior.
    pub alert_cooldown_secs: Option<u64>,
}

impl BudgetLimits {
    /// Build limits from the host configuration.
    ///
    /// With alerting disabled in config, the resulting limits never fire.
    pub fn from_config(config: &tollbox_config::BudgetConfig) -> Self {
        if !config.alerts_enabled {
            return Self::default();
        }
        Self {
            daily: config.daily_limit_usd,
            weekly: config.weekly_limit_usd,
            monthly: config.monthly_limit_usd,
            alert_cooldown_secs: config.alert_cooldown_secs,
        }
    }

    fn limit_for(&self, period: BudgetPeriod) -> Option<f64> {
        let limit = match period {
            BudgetPeriod::Daily => self.daily,
            BudgetPeriod::Weekly => self.weekly,
            BudgetPeriod::Monthly => self.monthly,
        };
        limit.filter(|l| *l > 0.0)
    }
}

/// Threshold-crossing detector owned by the ledger and run under its write
/// lock on every track.
#[derive(Default)]
pub(crate) struct BudgetMonitor {
    limits: BudgetLimits,
    callback: Option<BudgetCallback>,
    last_fired: HashMap<BudgetPeriod, DateTime<Utc>>,
}

impl BudgetMonitor {
    /// Replace limits and callback. Clears any cooldown state.
    pub(crate) fn configure(&mut self, limits: BudgetLimits, callback: BudgetCallback) {
        self.limits = limits;
        self.callback = Some(callback);
        self.last_fired.clear();
    }

    /// Compare each enabled period's current bucket against its soft
    /// threshold and notify on every crossing.
    pub(crate) fn check(&mut self, totals: &HashMap<String, f64>, now: DateTime<Utc>) {
        let Some(callback) = self.callback.clone() else {
            return;
        };

        for period in BudgetPeriod::ALL {
            let Some(limit) = self.limits.limit_for(period) else {
                continue;
            };
            let total = totals
                .get(&period.bucket_key(now))
                .copied()
                .unwrap_or(0.0);
            if total <= limit * SOFT_THRESHOLD_RATIO {
                continue;
            }
            if let Some(cooldown) = self.limits.alert_cooldown_secs {
                if let Some(last) = self.last_fired.get(&period) {
                    if (now - *last).num_seconds() < cooldown as i64 {
                        continue;
                    }
                }
            }
            warn!(
                period = %period,
                total,
                limit,
                "spend exceeds {:.0}% of budget limit",
                SOFT_THRESHOLD_RATIO * 100.0
            );
            self.last_fired.insert(period, now);
            callback(total, limit, period);
        }
    }
}
