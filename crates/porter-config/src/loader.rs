// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./porter.toml` > `~/.config/porter/porter.toml`
//! > `/etc/porter/porter.toml` with environment variable overrides via the
//! `PORTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PorterConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/porter/porter.toml` (system-wide)
/// 3. `~/.config/porter/porter.toml` (user XDG config)
/// 4. `./porter.toml` (local directory)
/// 5. `PORTER_*` environment variables
pub fn load_config() -> Result<PorterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PorterConfig::default()))
        .merge(Toml::file("/etc/porter/porter.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("porter/porter.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("porter.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PorterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PorterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PorterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PorterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PORTER_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("PORTER_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. PORTER_TELEGRAM_BOT_TOKEN -> "telegram_bot_token".
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
