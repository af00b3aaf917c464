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

//! Link event processing.
//!
//! The single place where link events and command sends turn into state
//! changes and transcript lines. Failures are rendered, never retried and
//! never propagated further.

use std::sync::Arc;
use tracing::{error, info};

use crate::link::{CommandSender, LinkEvent};
use crate::state::AppState;
use crate::transcript::Transcript;

/// Applies link events to shared state and the transcript.
#[derive(Clone)]
pub struct EventProcessor {
    state: Arc<AppState>,
    transcript: Arc<Transcript>,
}

impl EventProcessor {
    pub fn new(state: Arc<AppState>, transcript: Arc<Transcript>) -> Self {
        Self { state, transcript }
    }

    /// Process a single link event.
    pub fn process_event(&self, event: LinkEvent) {
        match event {
            LinkEvent::Connected { device_name } => {
                info!("Connected to {}", device_name);
                self.transcript
                    .notice(format!("Connected to {}", device_name));
                self.state.set_connected(device_name);
            }
            LinkEvent::DataReceived(text) => {
                self.transcript.incoming(format!("Received: {}", text));
            }
            LinkEvent::ConnectFailed(message) => {
                error!("Connect failed: {}", message);
                self.transcript.notice(message);
                self.state.set_disconnected();
            }
            LinkEvent::Disconnected { reason } => {
                match reason {
                    Some(e) => {
                        error!("Connection lost: {}", e);
                        self.transcript.notice(format!("Connection lost: {}", e));
                    }
                    None => {
                        info!("Connection closed by remote");
                        self.transcript.notice("Connection closed by remote");
                    }
                }
                self.state.set_disconnected();
            }
        }
    }

    /// Send a user command over the link, logging the outcome.
    ///
    /// A send while disconnected never reaches a socket; it only appends
    /// a rejection line.
    pub async fn send_command(&self, sender: &CommandSender, command: &str) {
        if !sender.is_connected().await {
            self.transcript.notice(format!(
                "Not connected to {}",
                self.state
                    .device_name()
                    .unwrap_or_else(|| "peripheral".to_string())
            ));
            return;
        }

        match sender.send(command).await {
            Ok(()) => {
                self.transcript.outgoing(format!("Sent: {}", command));
            }
            Err(e) => {
                error!("Send failed: {:#}", e);
                self.transcript
                    .notice(format!("Error sending command: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LinkStatus;

    fn processor() -> (EventProcessor, Arc<AppState>, Arc<Transcript>) {
        let state = AppState::new();
        let transcript = Transcript::new();
        (
            EventProcessor::new(state.clone(), transcript.clone()),
            state,
            transcript,
        )
    }

    #[test]
    fn connect_failure_logs_one_line_and_stays_disconnected() {
        let (processor, state, transcript) = processor();

        processor.process_event(LinkEvent::ConnectFailed(
            "'ESP32test' not found. Please pair the device first".to_string(),
        ));

        assert_eq!(transcript.len(), 1);
        assert!(transcript.entries()[0].text.contains("not found"));
        assert_eq!(state.status(), LinkStatus::Disconnected);
    }

    #[test]
    fn permission_failure_logs_one_line_and_stays_disconnected() {
        let (processor, state, transcript) = processor();

        processor.process_event(LinkEvent::ConnectFailed(
            "Bluetooth is not available: Permission denied".to_string(),
        ));

        assert_eq!(transcript.len(), 1);
        assert_eq!(state.status(), LinkStatus::Disconnected);
    }

    #[test]
    fn connected_sets_status_and_device() {
        let (processor, state, _transcript) = processor();

        processor.process_event(LinkEvent::Connected {
            device_name: "ESP32test".to_string(),
        });

        assert_eq!(state.status(), LinkStatus::Connected);
        assert_eq!(state.device_name().as_deref(), Some("ESP32test"));
    }

    #[test]
    fn read_error_reverts_to_disconnected() {
        let (processor, state, transcript) = processor();
        processor.process_event(LinkEvent::Connected {
            device_name: "dev".to_string(),
        });

        processor.process_event(LinkEvent::Disconnected {
            reason: Some("Connection reset by peer".to_string()),
        });

        assert_eq!(state.status(), LinkStatus::Disconnected);
        let entries = transcript.entries();
        assert!(entries
            .last()
            .unwrap()
            .text
            .starts_with("Connection lost:"));
    }

    #[tokio::test]
    async fn send_while_disconnected_logs_rejection() {
        let (processor, _state, transcript) = processor();
        let sender = CommandSender::new();

        processor.send_command(&sender, "LED ON").await;

        assert_eq!(transcript.len(), 1);
        assert!(transcript.entries()[0].text.starts_with("Not connected"));
    }

    #[tokio::test]
    async fn successful_send_logs_sent_line() {
        let (processor, _state, transcript) = processor();
        let sender = CommandSender::new();
        let (local, _remote) = tokio::io::duplex(64);
        sender.attach(Box::new(local)).await;

        processor.send_command(&sender, "LED ON").await;

        assert_eq!(transcript.entries().last().unwrap().text, "Sent: LED ON");
    }
}
