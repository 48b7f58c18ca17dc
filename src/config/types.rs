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

//! Configuration type definitions.

/// Bastion connection parameters, filled incrementally across the
/// precedence chain.
///
/// After [`crate::BastionResolver::resolve`] returns, `port` and `user` are
/// always set (hardcoded defaults apply last); `host` stays `None` when no
/// source supplies one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BastionConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
}

impl BastionConfig {
    /// All three fields filled; later precedence stages can be skipped.
    pub fn is_complete(&self) -> bool {
        self.host.is_some() && self.port.is_some() && self.user.is_some()
    }
}
