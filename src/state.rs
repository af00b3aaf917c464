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

//! Shared link state.

use parking_lot::RwLock;
use std::sync::Arc;

/// Connection status of the serial link.
///
/// Errors are never a status of their own; they show up as transcript
/// lines and the status reverts to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Disconnected => "Disconnected",
            LinkStatus::Connecting => "Connecting...",
            LinkStatus::Connected => "Connected",
        }
    }
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Current link status.
    pub link_status: RwLock<LinkStatus>,

    /// Name of the connected peripheral.
    pub connected_device: RwLock<Option<String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            link_status: RwLock::new(LinkStatus::Disconnected),
            connected_device: RwLock::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_connecting(&self) {
        *self.link_status.write() = LinkStatus::Connecting;
    }

    pub fn set_connected(&self, device_name: String) {
        *self.link_status.write() = LinkStatus::Connected;
        *self.connected_device.write() = Some(device_name);
    }

    pub fn set_disconnected(&self) {
        *self.link_status.write() = LinkStatus::Disconnected;
        *self.connected_device.write() = None;
    }

    pub fn status(&self) -> LinkStatus {
        *self.link_status.read()
    }

    pub fn device_name(&self) -> Option<String> {
        self.connected_device.read().clone()
    }

    /// Status text for the UI, e.g. "Connected to ESP32test".
    pub fn status_line(&self) -> String {
        match self.status() {
            LinkStatus::Connected => match self.device_name() {
                Some(name) => format!("Connected to {}", name),
                None => "Connected".to_string(),
            },
            other => other.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let state = AppState::new();
        assert_eq!(state.status(), LinkStatus::Disconnected);
        assert_eq!(state.device_name(), None);
        assert_eq!(state.status_line(), "Disconnected");
    }

    #[test]
    fn connect_then_disconnect_clears_device() {
        let state = AppState::new();
        state.set_connecting();
        assert_eq!(state.status_line(), "Connecting...");

        state.set_connected("ESP32test".to_string());
        assert_eq!(state.status(), LinkStatus::Connected);
        assert_eq!(state.status_line(), "Connected to ESP32test");

        state.set_disconnected();
        assert_eq!(state.status(), LinkStatus::Disconnected);
        assert_eq!(state.device_name(), None);
    }
}
