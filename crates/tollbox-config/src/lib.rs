// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Tollbox host application.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides. The cost core is configured programmatically; this
//! crate exists so the host has one blessed way to produce those settings.
//!
//! # Usage
//!
//! ```no_run
//! use tollbox_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Daily limit: {:?}", config.budget.daily_limit_usd);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BudgetConfig, TollboxConfig};
pub use validation::validate_config;

use tollbox_core::TollboxError;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<TollboxConfig, TollboxError> {
    let config = loader::load_config().map_err(|e| TollboxError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TollboxConfig, TollboxError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|e| TollboxError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
