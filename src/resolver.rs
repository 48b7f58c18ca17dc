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

//! Bastion parameter resolution.
//!
//! Sources are consulted in strict precedence order, per field:
//!
//! 1. tokens embedded in the remote command line (`bastion_host=...`),
//! 2. the local YAML config file,
//! 3. the Ansible inventory hostvars for the target,
//! 4. `BASTION_HOST` / `BASTION_PORT` / `BASTION_USER` environment
//!    fallbacks captured in [`Settings`],
//! 5. hardcoded defaults (port 22, the invoking user; none for host).
//!
//! A field filled by an earlier stage is never overwritten. The inventory
//! stage is skipped entirely when stages 1-2 already filled every field;
//! it is the only stage with material latency.

use anyhow::Result;
use serde_json::Value;

use crate::config::{loader, BastionConfig};
use crate::inventory::{HostVars, InventoryFetcher};
use crate::settings::Settings;
use crate::vars::resolve_value;

/// Default bastion SSH port.
pub const DEFAULT_PORT: u16 = 22;

const HOST_VAR: &str = "bastion_host";
const PORT_VAR: &str = "bastion_port";
const USER_VAR: &str = "bastion_user";

pub struct BastionResolver<'a> {
    settings: &'a Settings,
}

impl<'a> BastionResolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Resolve the bastion parameters for `target_host`.
    ///
    /// `raw_command` is the remote command text; automation layers that
    /// cannot reach our environment inject `bastion_*=value` tokens there.
    pub fn resolve(&self, target_host: &str, raw_command: &str) -> Result<BastionConfig> {
        let mut config = extract_inline(raw_command);

        let (host, port, user) =
            loader::load(&self.settings.conf_file, config.host, config.port, config.user);
        config = BastionConfig { host, port, user };

        if !config.is_complete() {
            let vars = InventoryFetcher::new(self.settings).host_vars(target_host)?;

            if config.host.is_none() {
                config.host =
                    lookup(&vars, HOST_VAR).or_else(|| self.settings.fallback_host.clone());
            }
            if config.port.is_none() {
                config.port = lookup(&vars, PORT_VAR)
                    .and_then(|raw| parse_port(&raw))
                    .or(self.settings.fallback_port);
            }
            if config.user.is_none() {
                config.user =
                    lookup(&vars, USER_VAR).or_else(|| self.settings.fallback_user.clone());
            }
        }

        if config.port.is_none() {
            config.port = Some(DEFAULT_PORT);
        }
        if config.user.is_none() {
            config.user = Some(whoami::username());
        }

        tracing::debug!(
            "resolved bastion for {target_host}: host={:?} port={:?} user={:?}",
            config.host,
            config.port,
            config.user
        );

        Ok(config)
    }
}

/// Scalar hostvars value by name, dereferencing `{{ }}` indirection. An
/// empty resolution (absent key or cycle) reads as "not present".
fn lookup(vars: &HostVars, name: &str) -> Option<String> {
    let raw = vars.get(name)?;
    match resolve_value(raw, vars) {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => {
            tracing::debug!("ignoring non-scalar {name} value: {other}");
            None
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.parse()
        .map_err(|_| tracing::warn!("invalid bastion port value {raw:?}, ignoring"))
        .ok()
}

/// Pick `bastion_*=value` tokens out of the remote command text.
///
/// Matching is case-insensitive and positional within the token, so both
/// `BASTION_HOST=gw` and `-e bastion_host=gw` style tokens are caught.
fn extract_inline(raw_command: &str) -> BastionConfig {
    let mut config = BastionConfig::default();

    for token in raw_command.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        if config.host.is_none() {
            config.host = inline_value(token, &lower, HOST_VAR);
        }
        if config.port.is_none() {
            config.port = inline_value(token, &lower, PORT_VAR).and_then(|raw| parse_port(&raw));
        }
        if config.user.is_none() {
            config.user = inline_value(token, &lower, USER_VAR);
        }
    }

    config
}

fn inline_value(token: &str, lower: &str, name: &str) -> Option<String> {
    let marker = format!("{name}=");
    let start = lower.find(&marker)? + marker.len();
    // to_ascii_lowercase preserves byte offsets
    let value = &token[start..];
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_tokens_fill_all_fields() {
        let config =
            extract_inline("BASTION_HOST=b.example BASTION_PORT=2222 BASTION_USER=bob uptime");
        assert_eq!(
            config,
            BastionConfig {
                host: Some("b.example".to_string()),
                port: Some(2222),
                user: Some("bob".to_string()),
            }
        );
    }

    #[test]
    fn inline_matching_is_case_insensitive_and_positional() {
        let config = extract_inline("-e bastion_host=gw.example true");
        assert_eq!(config.host.as_deref(), Some("gw.example"));

        let config = extract_inline("FOO_BASTION_USER=alice true");
        assert_eq!(config.user.as_deref(), Some("alice"));
    }

    #[test]
    fn inline_first_occurrence_wins() {
        let config = extract_inline("BASTION_HOST=first BASTION_HOST=second");
        assert_eq!(config.host.as_deref(), Some("first"));
    }

    #[test]
    fn inline_absent_or_empty_stays_unset() {
        let config = extract_inline("uptime -a BASTION_HOST=");
        assert_eq!(config, BastionConfig::default());
    }

    #[test]
    fn inline_bad_port_is_ignored() {
        let config = extract_inline("BASTION_PORT=not-a-port");
        assert_eq!(config.port, None);
    }

    #[test]
    fn lookup_dereferences_indirection() {
        let vars: HostVars = [
            ("bastion_host".to_string(), json!("{{ gateway }}")),
            ("gateway".to_string(), json!("gw.example")),
        ]
        .into_iter()
        .collect();
        assert_eq!(lookup(&vars, "bastion_host").as_deref(), Some("gw.example"));
    }

    #[test]
    fn lookup_cycle_reads_as_absent() {
        let vars: HostVars = [
            ("bastion_host".to_string(), json!("{{ a }}")),
            ("a".to_string(), json!("{{ bastion_host }}")),
        ]
        .into_iter()
        .collect();
        assert_eq!(lookup(&vars, "bastion_host"), None);
    }

    #[test]
    fn lookup_numeric_value_stringifies() {
        let vars: HostVars = [("bastion_port".to_string(), json!(2222))]
            .into_iter()
            .collect();
        assert_eq!(lookup(&vars, "bastion_port").as_deref(), Some("2222"));
    }
}
