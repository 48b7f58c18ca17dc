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

//! ssh flavor: `sshwrap [options...] <host> <command>`.
//!
//! Ansible passes connection options as bare `User=`/`Port=` tokens. Those
//! carry the *remote* user and port; they are remembered for the far side
//! of the bastion and rewritten in place to the bastion's own values.

use anyhow::{bail, Result};

use super::{exec_ssh, resolve_bastion, Bastion, NO_HOST_KEY_CHECK, SSH_COMMAND};
use crate::settings::Settings;

/// Build the final ssh argv (including `argv[0]`) without executing it.
pub fn build_command(argv: &[String], settings: &Settings) -> Result<Vec<String>> {
    let mut args = argv.to_vec();

    let Some(command) = args.pop() else {
        bail!("usage: sshwrap [options] <host> <command>");
    };
    let Some(host) = args.pop() else {
        bail!("usage: sshwrap [options] <host> <command>");
    };

    let Bastion {
        host: bastion_host,
        port: bastion_port,
        user: bastion_user,
    } = resolve_bastion(settings, &host, &command)?;

    let mut remote_user: Option<String> = None;
    let mut remote_port = "22".to_string();
    for arg in args.iter_mut() {
        if let Some(user) = arg.strip_prefix("User=") {
            remote_user = Some(user.to_string());
            *arg = format!("User={bastion_user}");
        } else if let Some(port) = arg.strip_prefix("Port=") {
            remote_port = port.to_string();
            *arg = format!("Port={bastion_port}");
        }
    }

    let mut cmd = vec![
        SSH_COMMAND.to_string(),
        "-p".to_string(),
        bastion_port.to_string(),
        "-q".to_string(),
        "-o".to_string(),
        NO_HOST_KEY_CHECK.to_string(),
        "-l".to_string(),
        bastion_user,
        bastion_host,
        "-t".to_string(),
    ];
    cmd.extend(args);
    cmd.push("--".to_string());
    cmd.push("-q".to_string());
    cmd.push("--never-escape".to_string());
    if let Some(user) = remote_user {
        cmd.push("--user".to_string());
        cmd.push(user);
    }
    cmd.push("--port".to_string());
    cmd.push(remote_port);
    cmd.push(host);
    cmd.push("--".to_string());
    cmd.push(command);

    Ok(cmd)
}

/// Resolve, assemble and exec. Only returns on failure.
pub fn run(argv: &[String], settings: &Settings) -> Result<()> {
    let cmd = build_command(argv, settings)?;
    exec_ssh(settings, &cmd)
}
