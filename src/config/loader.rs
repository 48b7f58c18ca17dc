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

//! Optional YAML config-file fallback.
//!
//! A soft layer: an absent file is normal, and a malformed one is logged
//! and skipped rather than aborting a connection that may still resolve
//! from the inventory or the environment.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ConfFile {
    bastion_host: Option<String>,
    bastion_port: Option<u16>,
    bastion_user: Option<String>,
}

fn parse(path: &Path) -> Result<ConfFile> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// Fill still-unset fields from the config file at `path`.
///
/// Values already set by an earlier precedence stage are never overwritten.
/// A missing file returns the inputs unchanged; so does an unreadable or
/// unparsable one, with a warning.
pub fn load(
    path: &Path,
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
) -> (Option<String>, Option<u16>, Option<String>) {
    if !path.exists() {
        return (host, port, user);
    }

    match parse(path) {
        Ok(conf) => (
            host.or(conf.bastion_host),
            port.or(conf.bastion_port),
            user.or(conf.bastion_user),
        ),
        Err(err) => {
            tracing::warn!("unusable bastion config file {}: {err:#}", path.display());
            (host, port, user)
        }
    }
}
