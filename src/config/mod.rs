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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the debug log.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Bluetooth settings.
    pub bluetooth: BluetoothConfig,

    /// Terminal settings.
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BluetoothConfig {
    /// Display name of the paired peripheral to connect to.
    pub device_name: String,

    /// RFCOMM channel. ESP32 BluetoothSerial exposes the SPP service on
    /// channel 1.
    pub channel: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Show a timestamp in front of each transcript line.
    pub show_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("blueterm"),
            bluetooth: BluetoothConfig {
                device_name: "ESP32test".to_string(),
                channel: 1,
            },
            terminal: TerminalConfig {
                show_timestamps: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blueterm");

        std::fs::create_dir_all(&config_dir)?;

        let mut config = Self::load_from(&config_dir.join("config.toml"))?;

        config.data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blueterm");
        std::fs::create_dir_all(&config.data_dir)?;

        Ok(config)
    }

    /// Load from a specific path, writing defaults there if missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(config_path, content)?;
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blueterm");

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.bluetooth.device_name, "ESP32test");
        assert_eq!(config.bluetooth.channel, 1);
        assert!(config.terminal.show_timestamps);
    }

    #[test]
    fn values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.bluetooth.device_name = "nano-sensor".to_string();
        config.bluetooth.channel = 3;
        let content = toml::to_string_pretty(&config).unwrap();
        std::fs::write(&path, content).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.bluetooth.device_name, "nano-sensor");
        assert_eq!(reloaded.bluetooth.channel, 3);
    }
}
