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

//! Time-boxed, file-backed inventory cache.
//!
//! The inventory query is by far the most expensive step of the pipeline
//! (subprocess spawn plus a full topology walk), while wrapper invocations
//! come once per connection. A short TTL amortizes the cost. The cache is
//! advisory only: concurrent invocations may race on the file, so any read
//! problem is treated as a miss and any stale or corrupt entry is discarded,
//! never trusted.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::Inventory;

#[derive(Debug, Deserialize)]
struct CacheEntry {
    inventory: Inventory,
    updated_at: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Best-effort removal of an unusable cache file. Permission problems and
/// races with other invocations are not escalated.
fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        tracing::debug!("could not remove cache file {}: {err}", path.display());
    }
}

/// Read a cached inventory, returning `None` on miss.
///
/// A missing file is a plain miss. A corrupt or expired entry is also a
/// miss, and the file is deleted so the next invocation starts clean.
pub fn read(path: &Path, ttl: u64) -> Option<Inventory> {
    let raw = fs::read_to_string(path).ok()?;

    let entry: CacheEntry = match serde_json::from_str(&raw) {
        Ok(entry) => entry,
        Err(err) => {
            tracing::debug!("corrupt inventory cache {}: {err}", path.display());
            discard(path);
            return None;
        }
    };

    if unix_now().saturating_sub(entry.updated_at) >= ttl {
        tracing::debug!("inventory cache {} expired", path.display());
        discard(path);
        return None;
    }

    Some(entry.inventory)
}

/// Persist a freshly fetched inventory, overwriting any previous entry.
///
/// Errors propagate so the caller can log them, but a failed write must
/// never block returning the inventory itself.
pub fn write(path: &Path, inventory: &Inventory) -> Result<()> {
    let entry = serde_json::json!({
        "inventory": inventory,
        "updated_at": unix_now(),
    });
    let data = serde_json::to_string(&entry).context("failed to serialize inventory cache")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write inventory cache {}", path.display()))
}
