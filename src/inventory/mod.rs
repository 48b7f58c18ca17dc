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

//! Ansible inventory access: fetching, per-host lookup and the file cache.

pub mod cache;
pub mod fetcher;

pub use fetcher::InventoryFetcher;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-host variable mapping as emitted by the inventory tool. Values may be
/// strings, numbers or indirect `{{ var }}` references.
pub type HostVars = serde_json::Map<String, serde_json::Value>;

/// Inventory document shape produced by `ansible-inventory --list`.
///
/// Group keys outside `_meta` are ignored; only the hostvars mapping is
/// needed to resolve bastion parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub hostvars: HashMap<String, HostVars>,
}
