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

use std::process::Command;

use anyhow::{Context, Result};
use serde_json::Value;

use super::{cache, HostVars, Inventory};
use crate::error::Error;
use crate::settings::Settings;
use crate::utils::fs::find_executable;

/// Name of the external inventory tool.
pub const INVENTORY_COMMAND: &str = "ansible-inventory";

/// Hostvars field carrying the host's connection address. The inventory is
/// keyed by FQDN while callers usually hand us an address, so lookups match
/// on either.
pub const ALIAS_VAR: &str = "ansible_host";

/// Fetches the Ansible inventory and extracts per-host variable sets.
pub struct InventoryFetcher<'a> {
    settings: &'a Settings,
}

impl<'a> InventoryFetcher<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Fetch the full inventory, from the cache when possible.
    ///
    /// A missing inventory executable or a non-zero exit from the tool is
    /// fatal; a failed cache write is not.
    pub fn fetch(&self) -> Result<Inventory> {
        let command = find_executable(INVENTORY_COMMAND, self.settings.search_path.as_deref())
            .ok_or_else(|| Error::ExecutableNotFound(INVENTORY_COMMAND.to_string()))?;

        if let Some(cache_path) = &self.settings.cache_path {
            if let Some(inventory) = cache::read(cache_path, self.settings.cache_ttl) {
                tracing::debug!("using cached inventory from {}", cache_path.display());
                return Ok(inventory);
            }
        }

        // ex: export BASTION_ANSIBLE_INV_OPTIONS="-i my_inventory -i my_second_inventory"
        let extra = shell_words::split(&self.settings.inventory_options)
            .context("invalid BASTION_ANSIBLE_INV_OPTIONS value")?;

        let output = Command::new(&command)
            .args(&extra)
            .arg("--list")
            .output()
            .with_context(|| format!("failed to run {}", command.display()))?;

        if !output.status.success() {
            return Err(Error::InventoryQuery {
                command: INVENTORY_COMMAND.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let inventory: Inventory = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("{INVENTORY_COMMAND} produced invalid JSON"))?;

        if let Some(cache_path) = &self.settings.cache_path {
            if let Err(err) = cache::write(cache_path, &inventory) {
                tracing::warn!("inventory cache not updated: {err:#}");
            }
        }

        Ok(inventory)
    }

    /// Variable set for `host`, matching its inventory key or its
    /// [`ALIAS_VAR`] value. An unknown host yields an empty mapping so later
    /// fallback layers can still supply values.
    pub fn host_vars(&self, host: &str) -> Result<HostVars> {
        let inventory = self.fetch()?;
        let hostvars = inventory.meta.hostvars;

        if let Some(vars) = hostvars.get(host) {
            return Ok(vars.clone());
        }

        for vars in hostvars.values() {
            if vars.get(ALIAS_VAR).and_then(Value::as_str) == Some(host) {
                return Ok(vars.clone());
            }
        }

        Ok(HostVars::new())
    }
}
