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

//! Outgoing RFCOMM connections to a bonded peripheral.

use anyhow::{anyhow, bail, Context, Result};
use bluer::rfcomm::{SocketAddr, Stream};
use bluer::{Adapter, Address};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use super::sender::CommandSender;
use super::session::{LinkEvent, LinkSession};
use crate::config::BluetoothConfig;

/// Standard SPP UUID. The service the peripheral advertises; the actual
/// socket is addressed by RFCOMM channel.
pub const SPP_UUID: Uuid = Uuid::from_u128(0x00001101_0000_1000_8000_00805F9B34FB);

/// A previously paired peripheral.
#[derive(Debug, Clone)]
pub struct BondedDevice {
    pub address: Address,
    pub name: String,
}

/// Startup probe. Returns a warning line for the transcript when
/// Bluetooth is missing or switched off, `None` when all is well.
pub async fn adapter_notice() -> Option<String> {
    let session = match bluer::Session::new().await {
        Ok(session) => session,
        Err(e) => return Some(format!("Bluetooth is not available: {}", e)),
    };
    let adapter = match session.default_adapter().await {
        Ok(adapter) => adapter,
        Err(e) => return Some(format!("No Bluetooth adapter found: {}", e)),
    };
    match adapter.is_powered().await {
        Ok(true) => None,
        Ok(false) => Some("Bluetooth is turned off. Please enable it".to_string()),
        Err(e) => Some(format!("Bluetooth adapter error: {}", e)),
    }
}

/// Find a bonded device by exact display name.
pub async fn find_bonded_device(adapter: &Adapter, name: &str) -> Result<Option<BondedDevice>> {
    for addr in adapter.device_addresses().await? {
        let device = adapter.device(addr)?;
        if !device.is_paired().await? {
            continue;
        }
        let alias = device.alias().await.unwrap_or_else(|_| addr.to_string());
        if alias == name {
            return Ok(Some(BondedDevice {
                address: addr,
                name: alias,
            }));
        }
    }
    Ok(None)
}

/// Connect to the configured peripheral and run the read loop until the
/// stream ends. Every failure collapses into a single `ConnectFailed`
/// event; nothing is retried.
pub async fn connect_and_run(
    config: BluetoothConfig,
    sender: CommandSender,
    event_tx: mpsc::Sender<LinkEvent>,
) {
    if let Err(e) = try_connect(&config, &sender, &event_tx).await {
        warn!("Connect attempt failed: {:#}", e);
        let _ = event_tx
            .send(LinkEvent::ConnectFailed(format!("{:#}", e)))
            .await;
    }
}

async fn try_connect(
    config: &BluetoothConfig,
    sender: &CommandSender,
    event_tx: &mpsc::Sender<LinkEvent>,
) -> Result<()> {
    // Session or adapter failures cover the no-Bluetooth and D-Bus
    // permission-denied cases alike.
    let session = bluer::Session::new()
        .await
        .context("Bluetooth is not available")?;
    let adapter = session
        .default_adapter()
        .await
        .context("No Bluetooth adapter found")?;
    info!("Using Bluetooth adapter: {}", adapter.name());

    if !adapter.is_powered().await? {
        bail!("Bluetooth is turned off. Please enable it and try again");
    }

    let device = find_bonded_device(&adapter, &config.device_name)
        .await?
        .ok_or_else(|| {
            anyhow!(
                "'{}' not found. Please pair the device first",
                config.device_name
            )
        })?;
    info!(
        "Found bonded device {} at {} (SPP {})",
        device.name, device.address, SPP_UUID
    );

    let stream = Stream::connect(SocketAddr::new(device.address, config.channel))
        .await
        .with_context(|| format!("Connection to '{}' failed", device.name))?;
    info!(
        "RFCOMM stream open to {} on channel {}",
        device.address, config.channel
    );

    let (reader, writer) = stream.into_split();
    sender.attach(Box::new(writer)).await;

    LinkSession::new(reader, device.name, event_tx.clone())
        .run()
        .await;

    sender.detach().await;
    Ok(())
}
