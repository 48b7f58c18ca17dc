// Copyright 2026 The bastion-wrapper authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process environment captured as an explicit struct.
//!
//! Every environment variable the pipeline consumes is read exactly once,
//! here. The resolver and fetcher take a `&Settings` instead of touching
//! `std::env`, so the precedence chain is testable without mutating
//! process-wide state.

use std::env;
use std::path::PathBuf;

/// Default bastion configuration file path.
pub const DEFAULT_CONF_FILE: &str = "/etc/ovh/bastion/config.yml";

/// Default inventory cache validity in seconds.
pub const DEFAULT_CACHE_TTL: u64 = 60;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Executable search path (`PATH`). `None` falls back to the process
    /// environment at lookup time.
    pub search_path: Option<String>,
    /// Extra options passed to the inventory tool
    /// (`BASTION_ANSIBLE_INV_OPTIONS`), e.g. `-i my_inventory`.
    pub inventory_options: String,
    /// Inventory cache file (`BASTION_INV_CACHE_FILE`). Unset disables
    /// caching.
    pub cache_path: Option<PathBuf>,
    /// Cache validity in seconds (`BASTION_INV_CACHE_TTL`).
    pub cache_ttl: u64,
    /// Bastion configuration file (`BASTION_CONF_FILE`).
    pub conf_file: PathBuf,
    /// `BASTION_HOST` fallback.
    pub fallback_host: Option<String>,
    /// `BASTION_PORT` fallback.
    pub fallback_port: Option<u16>,
    /// `BASTION_USER` fallback.
    pub fallback_user: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_path: None,
            inventory_options: String::new(),
            cache_path: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            conf_file: PathBuf::from(DEFAULT_CONF_FILE),
            fallback_host: None,
            fallback_port: None,
            fallback_user: None,
        }
    }
}

impl Settings {
    /// Capture the process environment.
    pub fn from_env() -> Self {
        let cache_ttl = match env::var("BASTION_INV_CACHE_TTL") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "invalid BASTION_INV_CACHE_TTL value {raw:?}, using default {DEFAULT_CACHE_TTL}"
                );
                DEFAULT_CACHE_TTL
            }),
            Err(_) => DEFAULT_CACHE_TTL,
        };

        let fallback_port = env::var("BASTION_PORT").ok().and_then(|raw| {
            raw.parse()
                .map_err(|_| tracing::warn!("invalid BASTION_PORT value {raw:?}, ignoring"))
                .ok()
        });

        Self {
            search_path: env::var("PATH").ok(),
            inventory_options: env::var("BASTION_ANSIBLE_INV_OPTIONS").unwrap_or_default(),
            cache_path: env::var("BASTION_INV_CACHE_FILE").ok().map(PathBuf::from),
            cache_ttl,
            conf_file: env::var("BASTION_CONF_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONF_FILE)),
            fallback_host: env::var("BASTION_HOST").ok(),
            fallback_port,
            fallback_user: env::var("BASTION_USER").ok(),
        }
    }
}
