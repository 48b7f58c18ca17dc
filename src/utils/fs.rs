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

//! Executable lookup and process replacement.

use std::env;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Find the absolute path of an executable, mirroring shell `PATH` lookup.
///
/// If `name` is already an existing file path it is returned verbatim.
/// Otherwise each segment of `path` (or the process `PATH` when `None`) is
/// joined with `name` and the first hit that is a regular file wins.
pub fn find_executable(name: &str, path: Option<&str>) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }

    let search = match path {
        Some(p) => p.to_string(),
        None => env::var("PATH").unwrap_or_default(),
    };

    env::split_paths(&search)
        .map(|segment| segment.join(name))
        .find(|candidate| candidate.is_file())
}

/// Replace the current process image via `execv`.
///
/// `program` must be an absolute path; `args` includes `argv[0]`. Only
/// returns on failure.
pub fn exec_replace(program: &Path, args: &[String]) -> Result<()> {
    let prog = CString::new(program.as_os_str().as_bytes())
        .context("executable path contains a NUL byte")?;
    let argv = args
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("argument contains a NUL byte")?;

    tracing::debug!("exec {} {:?}", program.display(), args);

    nix::unistd::execv(&prog, &argv)
        .map(|_| ())
        .with_context(|| format!("failed to exec {}", program.display()))
}
