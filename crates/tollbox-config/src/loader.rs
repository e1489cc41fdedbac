// SPDX-FileCopyrightText: 2026 Tollbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading built on Figment.
//!
//! A local `tollbox.toml` wins over the user's XDG config, which wins over
//! the system-wide file; `TOLLBOX_`-prefixed environment variables override
//! everything.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TollboxConfig;

/// Load configuration from every standard location.
///
/// Sources, weakest first: compiled defaults, `/etc/tollbox/tollbox.toml`,
/// `~/.config/tollbox/tollbox.toml`, `./tollbox.toml`, then `TOLLBOX_*`
/// environment variables.
pub fn load_config() -> Result<TollboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboxConfig::default()))
        .merge(Toml::file("/etc/tollbox/tollbox.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tollbox/tollbox.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tollbox.toml"))
        .merge(env_provider())
        .extract()
}

/// Parse configuration from an inline TOML string over the compiled
/// defaults, skipping file and environment lookup. Intended for tests.
pub fn load_config_from_str(toml_content: &str) -> Result<TollboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring `TOLLBOX_*`
/// environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<TollboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TollboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider for `TOLLBOX_*` variables.
///
/// Only the leading section name is turned into a dotted path; the rest of
/// the variable keeps its underscores. `TOLLBOX_BUDGET_DAILY_LIMIT_USD`
/// becomes `budget.daily_limit_usd`, which a naive split on `_` would
/// mangle into `budget.daily.limit.usd`.
fn env_provider() -> Env {
    Env::prefixed("TOLLBOX_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str.replacen("budget_", "budget.", 1);
        mapped.into()
    })
}
