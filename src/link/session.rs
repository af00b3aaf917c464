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

//! The per-connection read loop.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Read buffer size. The wire format has no framing; each read returns
/// whatever the peripheral pushed since the last one.
pub const READ_BUF_SIZE: usize = 1024;

/// Events emitted by a link session and the connect path.
#[derive(Debug)]
pub enum LinkEvent {
    /// Link is up. Emitted before the first read is issued.
    Connected { device_name: String },
    /// A chunk of text arrived from the peripheral.
    DataReceived(String),
    /// A connect attempt failed before a session started.
    ConnectFailed(String),
    /// The read loop ended. `reason` is set for errors, `None` for a
    /// clean close by the remote.
    Disconnected { reason: Option<String> },
}

/// Runs the blocking read loop over an established stream.
///
/// Generic over the reader so tests can drive it with an in-memory duplex
/// pipe instead of an RFCOMM socket.
pub struct LinkSession<R> {
    reader: R,
    device_name: String,
    event_tx: mpsc::Sender<LinkEvent>,
}

impl<R: AsyncRead + Unpin> LinkSession<R> {
    pub fn new(reader: R, device_name: String, event_tx: mpsc::Sender<LinkEvent>) -> Self {
        Self {
            reader,
            device_name,
            event_tx,
        }
    }

    /// Run until EOF or read error. No reconnection, no backoff.
    pub async fn run(mut self) {
        info!("Link session started for {}", self.device_name);

        // Status must flip to Connected before any read happens.
        let _ = self
            .event_tx
            .send(LinkEvent::Connected {
                device_name: self.device_name.clone(),
            })
            .await;

        let mut buf = vec![0u8; READ_BUF_SIZE];

        loop {
            match self.reader.read(&mut buf).await {
                Ok(0) => {
                    info!("Connection closed by remote");
                    let _ = self
                        .event_tx
                        .send(LinkEvent::Disconnected { reason: None })
                        .await;
                    break;
                }
                Ok(n) => {
                    let text = String::from_utf8_lossy(&buf[..n]).trim().to_string();
                    debug!("Read {} bytes: {:?}", n, text);
                    if text.is_empty() {
                        continue;
                    }
                    let _ = self.event_tx.send(LinkEvent::DataReceived(text)).await;
                }
                Err(e) => {
                    error!("Read error: {}", e);
                    let _ = self
                        .event_tx
                        .send(LinkEvent::Disconnected {
                            reason: Some(e.to_string()),
                        })
                        .await;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    async fn collect_events(mut rx: mpsc::Receiver<LinkEvent>) -> Vec<LinkEvent> {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn connected_is_emitted_before_any_data() {
        let (local, mut remote) = tokio::io::duplex(64);
        let (tx, rx) = mpsc::channel(8);

        let session = LinkSession::new(local, "ESP32test".to_string(), tx);
        let handle = tokio::spawn(session.run());

        remote.write_all(b"temp=21.5\n").await.unwrap();
        remote.shutdown().await.unwrap();
        drop(remote);
        handle.await.unwrap();

        let events = collect_events(rx).await;
        assert!(matches!(
            &events[0],
            LinkEvent::Connected { device_name } if device_name == "ESP32test"
        ));
        assert!(matches!(
            &events[1],
            LinkEvent::DataReceived(text) if text == "temp=21.5"
        ));
        assert!(matches!(
            events.last(),
            Some(LinkEvent::Disconnected { reason: None })
        ));
    }

    #[tokio::test]
    async fn chunks_are_trimmed_and_blank_chunks_skipped() {
        let (local, mut remote) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);

        let session = LinkSession::new(local, "dev".to_string(), tx);
        let handle = tokio::spawn(session.run());

        assert!(matches!(
            rx.recv().await.unwrap(),
            LinkEvent::Connected { .. }
        ));

        remote.write_all(b"  ok  \r\n").await.unwrap();
        match rx.recv().await.unwrap() {
            LinkEvent::DataReceived(text) => assert_eq!(text, "ok"),
            other => panic!("unexpected event: {:?}", other),
        }

        // A chunk that trims to nothing produces no event; the next event
        // is the following chunk.
        remote.write_all(b"\r\n").await.unwrap();
        remote.write_all(b"done").await.unwrap();
        match rx.recv().await.unwrap() {
            LinkEvent::DataReceived(text) => assert_eq!(text, "done"),
            other => panic!("unexpected event: {:?}", other),
        }

        remote.shutdown().await.unwrap();
        drop(remote);
        handle.await.unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(LinkEvent::Disconnected { reason: None })
        ));
    }

    #[tokio::test]
    async fn invalid_utf8_is_decoded_lossily() {
        let (local, mut remote) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);

        let session = LinkSession::new(local, "dev".to_string(), tx);
        let handle = tokio::spawn(session.run());

        remote.write_all(&[b'o', b'k', 0xFF]).await.unwrap();
        remote.shutdown().await.unwrap();
        drop(remote);
        handle.await.unwrap();

        // Skip Connected, take the data event.
        rx.recv().await.unwrap();
        match rx.recv().await.unwrap() {
            LinkEvent::DataReceived(text) => assert_eq!(text, "ok\u{FFFD}"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
