// Copyright 2026 Blueterm Contributors
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

//! Blueterm entry point.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blueterm::config::Config;
use blueterm::link;
use blueterm::state::AppState;
use blueterm::transcript::Transcript;
use blueterm::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // The terminal owns stdout, so logs go to a file in the data dir.
    let log_file = std::fs::File::create(config.data_dir.join("blueterm.log"))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(log_file))
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blueterm=info".parse().unwrap()),
        )
        .init();

    info!("Starting blueterm v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configured peripheral: '{}'", config.bluetooth.device_name);

    let state = AppState::new();
    let transcript = Transcript::new();

    // Mirror the adapter state into the transcript before the first
    // connect attempt.
    if let Some(notice) = link::adapter_notice().await {
        transcript.notice(notice);
    }

    ui::run(config, state, transcript).await?;

    info!("blueterm stopped");
    Ok(())
}
