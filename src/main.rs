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
use lb_reconciler::cli::{CliArgs, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();
    let global = &args.global;

    match args.command {
        Commands::Status(cmd) => cmd.execute(global).await,
        Commands::List(cmd) => cmd.execute(global).await,
        Commands::Wait(cmd) => cmd.execute(global).await,
        Commands::Locate(cmd) => cmd.execute(global).await,
        Commands::Apply(cmd) => cmd.execute(global).await,
        Commands::Delete(cmd) => cmd.execute(global).await,
    }
}
