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

//! Write handle for user commands.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

/// Boxed write half of the active link.
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Shared handle to the write half of the current connection.
///
/// The connect path attaches a writer when a session starts and detaches
/// it when the session ends. While no writer is attached, `send` refuses
/// without touching any socket.
#[derive(Clone, Default)]
pub struct CommandSender {
    writer: Arc<Mutex<Option<BoxedWriter>>>,
}

impl CommandSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attach(&self, writer: BoxedWriter) {
        *self.writer.lock().await = Some(writer);
    }

    pub async fn detach(&self) {
        *self.writer.lock().await = None;
    }

    pub async fn is_connected(&self) -> bool {
        self.writer.lock().await.is_some()
    }

    /// Write the command's raw bytes to the link. No framing and no
    /// trailing newline; the peripheral sees exactly what was typed.
    pub async fn send(&self, command: &str) -> Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or_else(|| anyhow!("not connected"))?;

        writer.write_all(command.as_bytes()).await?;
        writer.flush().await?;
        debug!("Sent {} bytes", command.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn send_without_writer_fails() {
        let sender = CommandSender::new();
        assert!(!sender.is_connected().await);
        assert!(sender.send("LED ON").await.is_err());
    }

    #[tokio::test]
    async fn send_writes_raw_bytes() {
        let (local, mut remote) = tokio::io::duplex(64);
        let sender = CommandSender::new();
        sender.attach(Box::new(local)).await;
        assert!(sender.is_connected().await);

        sender.send("LED ON").await.unwrap();
        sender.detach().await;

        let mut received = Vec::new();
        remote.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"LED ON");
    }

    #[tokio::test]
    async fn detach_disconnects() {
        let (local, _remote) = tokio::io::duplex(64);
        let sender = CommandSender::new();
        sender.attach(Box::new(local)).await;
        sender.detach().await;
        assert!(!sender.is_connected().await);
        assert!(sender.send("x").await.is_err());
    }
}
