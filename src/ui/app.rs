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

//! UI-local state: the command input line and transcript scrolling.

/// State owned by the UI task.
#[derive(Debug, Default)]
pub struct TerminalApp {
    /// Command being typed.
    pub input: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Lines scrolled up from the tail. 0 follows the tail.
    pub scroll_offset: usize,
    pub should_quit: bool,
}

impl TerminalApp {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Take the current input for sending. Blank input yields `None`.
    pub fn take_input(&mut self) -> Option<String> {
        let command = std::mem::take(&mut self.input);
        self.cursor = 0;
        let command = command.trim().to_string();
        if command.is_empty() {
            None
        } else {
            Some(command)
        }
    }

    pub fn scroll_up(&mut self, step: usize, total_lines: usize) {
        let max = total_lines.saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + step).min(max);
    }

    pub fn scroll_down(&mut self, step: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(step);
    }
}
