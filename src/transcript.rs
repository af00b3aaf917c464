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

//! The terminal transcript.
//!
//! An append-only, in-memory log of display lines. Unbounded, cleared on
//! process restart. Single writer at a time; readers take a snapshot guard
//! for rendering.

use chrono::{DateTime, Local};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// What produced a transcript line. Used for styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Text read from the peripheral.
    Incoming,
    /// A command the user sent.
    Outgoing,
    /// Status and error lines.
    Notice,
}

/// One line of the transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub at: DateTime<Local>,
    pub kind: EntryKind,
    pub text: String,
}

/// Append-only message log.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: RwLock<Vec<TranscriptEntry>>,
}

impl Transcript {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, kind: EntryKind, text: impl Into<String>) {
        self.entries.write().push(TranscriptEntry {
            at: Local::now(),
            kind,
            text: text.into(),
        });
    }

    pub fn incoming(&self, text: impl Into<String>) {
        self.push(EntryKind::Incoming, text);
    }

    pub fn outgoing(&self, text: impl Into<String>) {
        self.push(EntryKind::Outgoing, text);
    }

    pub fn notice(&self, text: impl Into<String>) {
        self.push(EntryKind::Notice, text);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Read access for rendering. Hold the guard only while drawing.
    pub fn entries(&self) -> RwLockReadGuard<'_, Vec<TranscriptEntry>> {
        self.entries.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_append_order() {
        let log = Transcript::new();
        log.notice("Connecting to 'ESP32test'...");
        log.incoming("Received: hello");
        log.outgoing("Sent: LED ON");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Notice);
        assert_eq!(entries[1].text, "Received: hello");
        assert_eq!(entries[2].kind, EntryKind::Outgoing);
    }

    #[test]
    fn len_tracks_pushes() {
        let log = Transcript::new();
        assert!(log.is_empty());
        for i in 0..10 {
            log.incoming(format!("line {}", i));
        }
        assert_eq!(log.len(), 10);
    }
}
