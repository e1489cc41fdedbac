// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tollbox host application.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. The cost core itself never reads configuration;
//! the host loads this model and passes the budget settings to the ledger
//! programmatically.

use serde::{Deserialize, Serialize};

/// Top-level Tollbox configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TollboxConfig {
    /// Budget limits and alerting settings.
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// Budget limit and alerting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Daily spending ceiling in USD. `None` or a non-positive value
    /// disables the daily check.
    #[serde(default)]
    pub daily_limit_usd: Option<f64>,

    /// Weekly spending ceiling in USD.
    #[serde(default)]
    pub weekly_limit_usd: Option<f64>,

    /// Monthly spending ceiling in USD.
    #[serde(default)]
    pub monthly_limit_usd: Option<f64>,

    /// Minimum seconds between alert notifications per period.
    /// `None` fires on every tracked call once a threshold is crossed.
    #[serde(default)]
    pub alert_cooldown_secs: Option<u64>,

    /// Master switch for budget alerting.
    #[serde(default = "default_alerts_enabled")]
    pub alerts_enabled: bool,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            daily_limit_usd: None,
            weekly_limit_usd: None,
            monthly_limit_usd: None,
            alert_cooldown_secs: None,
            alerts_enabled: default_alerts_enabled(),
        }
    }
}

fn default_alerts_enabled() -> bool {
    true
}
