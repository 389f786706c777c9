// Copyright 2025 JiangLong.
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

use clap::Parser;
use std::process::ExitCode;
use topology_gen::cli::{init_tracing, CliArgs};
use topology_gen::infrastructure::constants::{EXIT_ADDRESS_EXHAUSTED, EXIT_FAILURE};
use topology_gen::TopologyError;
use tracing::error;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args.verbosity);

    match args.execute() {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(failure_code(&err))
        }
    }
}

fn failure_code(err: &anyhow::Error) -> u8 {
    let exhausted = err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<TopologyError>(),
            Some(TopologyError::AllocationExhausted { .. })
        )
    });
    if exhausted {
        EXIT_ADDRESS_EXHAUSTED
    } else {
        EXIT_FAILURE
    }
}
