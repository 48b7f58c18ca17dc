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

use anyhow::Result;

use bastion_wrapper::utils::init_logging;
use bastion_wrapper::{wrappers, Settings};

fn main() -> Result<()> {
    init_logging(0);

    let settings = Settings::from_env();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    wrappers::sftp::run(&argv, &settings)
}
