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

//! Transport wrappers.
//!
//! Ansible invokes these binaries as drop-in ssh/scp/sftp commands. Each
//! one splits the argv its flavor produces, resolves the bastion for the
//! target host, rebuilds an `ssh` invocation that goes through the bastion,
//! and replaces the process.

pub mod scp;
pub mod sftp;
pub mod ssh;

use anyhow::{anyhow, Result};

use crate::config::BastionConfig;
use crate::error::Error;
use crate::resolver::{BastionResolver, DEFAULT_PORT};
use crate::settings::Settings;
use crate::utils::fs::{exec_replace, find_executable};

/// The transport every wrapper ultimately execs.
pub const SSH_COMMAND: &str = "ssh";

/// The bastion's host key is managed out of band.
pub const NO_HOST_KEY_CHECK: &str = "StrictHostKeyChecking=no";

/// Finalized (host, port, user) triple for command assembly.
struct Bastion {
    host: String,
    port: u16,
    user: String,
}

/// Run the full pipeline for one target and demand a usable triple.
///
/// The resolver guarantees port and user; a missing host at this point
/// means no source knows a bastion for the target, which is fatal for a
/// wrapper about to exec through one.
fn resolve_bastion(settings: &Settings, target_host: &str, raw_command: &str) -> Result<Bastion> {
    let BastionConfig { host, port, user } =
        BastionResolver::new(settings).resolve(target_host, raw_command)?;

    Ok(Bastion {
        host: host.ok_or_else(|| anyhow!("no bastion host resolved for {target_host}"))?,
        port: port.unwrap_or(DEFAULT_PORT),
        user: user.unwrap_or_else(whoami::username),
    })
}

/// Locate `ssh` and replace the current process with `args`.
fn exec_ssh(settings: &Settings, args: &[String]) -> Result<()> {
    // execv needs the absolute path
    let ssh = find_executable(SSH_COMMAND, settings.search_path.as_deref())
        .ok_or_else(|| Error::ExecutableNotFound(SSH_COMMAND.to_string()))?;
    exec_replace(&ssh, args)
}
