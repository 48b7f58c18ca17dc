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

//! scp flavor: `scpwrap [options...] [--] <host> <scp-command>`.
//!
//! Remote user and port arrive as `-l`/`-p` pairs or `-o User=`/`-o Port=`
//! options; they are consumed rather than passed through. The scp command
//! itself is escaped for the bastion's `--scp-cmd` argument: `#` doubles
//! and spaces become `#`.

use anyhow::{bail, Result};

use super::{exec_ssh, resolve_bastion, Bastion, NO_HOST_KEY_CHECK, SSH_COMMAND};
use crate::settings::Settings;

/// Escape an scp command for transport as a single `--scp-cmd` token.
fn escape_scp_command(command: &str) -> String {
    command.replace('#', "##").replace(' ', "#")
}

/// Build the final ssh argv (including `argv[0]`) without executing it.
pub fn build_command(argv: &[String], settings: &Settings) -> Result<Vec<String>> {
    let mut remote_user: Option<String> = None;
    let mut remote_port = "22".to_string();
    let mut passthrough: Vec<String> = Vec::new();

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        let next = argv.get(i + 1);
        match (arg.as_str(), next) {
            ("-l", Some(user)) => {
                remote_user = Some(user.clone());
                i += 2;
            }
            ("-p", Some(port)) => {
                remote_port = port.clone();
                i += 2;
            }
            ("-o", Some(opt)) if opt.starts_with("User=") => {
                remote_user = opt.strip_prefix("User=").map(str::to_string);
                i += 2;
            }
            ("-o", Some(opt)) if opt.starts_with("Port=") => {
                remote_port = opt["Port=".len()..].to_string();
                i += 2;
            }
            ("--", _) => {
                passthrough.extend_from_slice(&argv[i + 1..]);
                break;
            }
            _ => {
                passthrough.push(arg.clone());
                i += 1;
            }
        }
    }

    let Some(scp_command) = passthrough.pop() else {
        bail!("usage: scpwrap [options] <host> <scp-command>");
    };
    let Some(host) = passthrough.pop() else {
        bail!("usage: scpwrap [options] <host> <scp-command>");
    };

    let Bastion {
        host: bastion_host,
        port: bastion_port,
        user: bastion_user,
    } = resolve_bastion(settings, &host, &scp_command)?;

    let mut cmd = vec![
        SSH_COMMAND.to_string(),
        format!("{bastion_user}@{bastion_host}"),
        "-p".to_string(),
        bastion_port.to_string(),
        "-o".to_string(),
        NO_HOST_KEY_CHECK.to_string(),
        "-T".to_string(),
    ];
    cmd.extend(passthrough);
    cmd.push("--".to_string());
    if let Some(user) = remote_user {
        cmd.push("--user".to_string());
        cmd.push(user);
    }
    cmd.push("--port".to_string());
    cmd.push(remote_port);
    cmd.push("--host".to_string());
    cmd.push(host);
    cmd.push("--osh".to_string());
    cmd.push("scp".to_string());
    cmd.push("--scp-cmd".to_string());
    cmd.push(escape_scp_command(&scp_command));

    Ok(cmd)
}

/// Resolve, assemble and exec. Only returns on failure.
pub fn run(argv: &[String], settings: &Settings) -> Result<()> {
    let cmd = build_command(argv, settings)?;
    exec_ssh(settings, &cmd)
}
