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

//! sftp flavor: `sftpwrap [options...] <host> <sftp-command>`.
//!
//! The sftp subsystem command itself is not forwarded; the bastion's
//! `--osh sftp` entry point replaces it. Remote user and port are read
//! from `-o User=`/`-o Port=` options, nothing else passes through.

use anyhow::{bail, Result};

use super::{exec_ssh, resolve_bastion, Bastion, NO_HOST_KEY_CHECK, SSH_COMMAND};
use crate::settings::Settings;

/// Build the final ssh argv (including `argv[0]`) without executing it.
pub fn build_command(argv: &[String], settings: &Settings) -> Result<Vec<String>> {
    let mut args = argv.to_vec();

    let Some(sftp_command) = args.pop() else {
        bail!("usage: sftpwrap [options] <host> <sftp-command>");
    };
    let Some(host) = args.pop() else {
        bail!("usage: sftpwrap [options] <host> <sftp-command>");
    };

    let mut remote_user: Option<String> = None;
    let mut remote_port = "22".to_string();
    for window in args.windows(2) {
        if window[0] != "-o" {
            continue;
        }
        if let Some(user) = window[1].strip_prefix("User=") {
            remote_user = Some(user.to_string());
        } else if let Some(port) = window[1].strip_prefix("Port=") {
            remote_port = port.to_string();
        }
    }

    let Bastion {
        host: bastion_host,
        port: bastion_port,
        user: bastion_user,
    } = resolve_bastion(settings, &host, &sftp_command)?;

    let mut cmd = vec![
        SSH_COMMAND.to_string(),
        format!("{bastion_user}@{bastion_host}"),
        "-p".to_string(),
        bastion_port.to_string(),
        "-o".to_string(),
        NO_HOST_KEY_CHECK.to_string(),
        "-T".to_string(),
        "--".to_string(),
    ];
    if let Some(user) = remote_user {
        cmd.push("--user".to_string());
        cmd.push(user);
    }
    cmd.push("--port".to_string());
    cmd.push(remote_port);
    cmd.push("--host".to_string());
    cmd.push(host);
    cmd.push("--osh".to_string());
    cmd.push("sftp".to_string());

    Ok(cmd)
}

/// Resolve, assemble and exec. Only returns on failure.
pub fn run(argv: &[String], settings: &Settings) -> Result<()> {
    let cmd = build_command(argv, settings)?;
    exec_ssh(settings, &cmd)
}
