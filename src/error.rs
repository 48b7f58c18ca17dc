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

//! Fatal error taxonomy.
//!
//! Only two conditions abort the pipeline: a required executable that cannot
//! be located, and an inventory query that exits non-zero. Every other
//! failure (stale cache, malformed config file, host absent from inventory,
//! cyclic variable reference) degrades to the next fallback layer and is
//! handled where it occurs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required external program is not on the search path.
    #[error("failed to identify path of {0}")]
    ExecutableNotFound(String),

    /// The inventory tool ran but exited non-zero.
    #[error("failed to query {command}: {stderr}")]
    InventoryQuery { command: String, stderr: String },
}
