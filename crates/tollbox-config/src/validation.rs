// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the configuration model.
//!
//! TOML accepts `nan` and `inf` floats, which would poison every running
//! total they touch, so limits must be finite. Non-positive limits are
//! allowed: they disable the corresponding period check.

use tollbox_core::TollboxError;

use crate::model::TollboxConfig;

/// Validate a deserialized configuration.
pub fn validate_config(config: &TollboxConfig) -> Result<(), TollboxError> {
    let limits = [
        ("budget.daily_limit_usd", config.budget.daily_limit_usd),
        ("budget.weekly_limit_usd", config.budget.weekly_limit_usd),
        ("budget.monthly_limit_usd", config.budget.monthly_limit_usd),
    ];

    for (name, limit) in limits {
        if let Some(value) = limit {
            if !value.is_finite() {
                return Err(TollboxError::Config(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BudgetConfig;

    fn config_with_daily(limit: f64) -> TollboxConfig {
        TollboxConfig {
            budget: BudgetConfig {
                daily_limit_usd: Some(limit),
                ..Default::default()
            },
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&TollboxConfig::default()).is_ok());
    }

    #[test]
    fn finite_limits_are_valid() {
        assert!(validate_config(&config_with_daily(10.0)).is_ok());
        // Non-positive limits disable the check rather than erroring.
        assert!(validate_config(&config_with_daily(0.0)).is_ok());
        assert!(validate_config(&config_with_daily(-1.0)).is_ok());
    }

    #[test]
    fn nan_limit_is_rejected() {
        let err = validate_config(&config_with_daily(f64::NAN)).unwrap_err();
        assert!(err.to_string().contains("daily_limit_usd"));
    }

    #[test]
    fn infinite_limit_is_rejected() {
        assert!(validate_config(&config_with_daily(f64::INFINITY)).is_err());
    }
}
