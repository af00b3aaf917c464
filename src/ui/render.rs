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

//! Frame rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::Config;
use crate::state::{AppState, LinkStatus};
use crate::transcript::{EntryKind, Transcript};

use super::app::TerminalApp;

/// Draw the UI: status bar, transcript, command input.
pub(super) fn draw(
    f: &mut Frame,
    app: &TerminalApp,
    state: &AppState,
    transcript: &Transcript,
    config: &Config,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input
        ])
        .split(f.area());

    draw_status(f, chunks[0], state);
    draw_transcript(f, chunks[1], app, transcript, config);
    draw_input(f, chunks[2], app);
}

fn status_color(status: LinkStatus) -> Color {
    match status {
        LinkStatus::Disconnected => Color::DarkGray,
        LinkStatus::Connecting => Color::Yellow,
        LinkStatus::Connected => Color::Green,
    }
}

fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let status = state.status();
    let line = Line::from(vec![
        Span::styled(
            state.status_line(),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "   F2 connect \u{2502} Enter send \u{2502} PgUp/PgDn scroll \u{2502} Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let status_bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Link ")
            .title_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn entry_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Incoming => Style::default().fg(Color::White),
        EntryKind::Outgoing => Style::default().fg(Color::Cyan),
        EntryKind::Notice => Style::default().fg(Color::Yellow),
    }
}

fn draw_transcript(
    f: &mut Frame,
    area: Rect,
    app: &TerminalApp,
    transcript: &Transcript,
    config: &Config,
) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let entries = transcript.entries();
    let total = entries.len();

    // Window anchored at the tail, shifted up by the scroll offset.
    let start_idx = if total <= inner_height {
        0
    } else {
        total
            .saturating_sub(inner_height)
            .saturating_sub(app.scroll_offset)
    };
    let end_idx = (start_idx + inner_height).min(total);

    let visible: Vec<Line> = entries[start_idx..end_idx]
        .iter()
        .map(|entry| {
            let mut spans = Vec::with_capacity(2);
            if config.terminal.show_timestamps {
                spans.push(Span::styled(
                    format!("{} ", entry.at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(entry.text.clone(), entry_style(entry.kind)));
            Line::from(spans)
        })
        .collect();

    let title = format!(" Terminal ({}/{}) ", end_idx, total);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_style(Style::default().fg(Color::White));

    let content = Paragraph::new(visible).block(block);
    f.render_widget(content, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &TerminalApp) {
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Command ")
            .title_style(Style::default().fg(Color::White)),
    );
    f.render_widget(input, area);

    let cursor_x = area.x + 1 + app.cursor.min(area.width.saturating_sub(2) as usize) as u16;
    f.set_cursor_position(Position::new(cursor_x, area.y + 1));
}
