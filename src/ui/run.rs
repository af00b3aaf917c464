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

//! The UI task: owns the terminal and multiplexes key and link events.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::events::EventProcessor;
use crate::link::{self, CommandSender, LinkEvent};
use crate::state::{AppState, LinkStatus};
use crate::transcript::Transcript;

use super::app::TerminalApp;
use super::render;
use super::terminal::{self, AppEvent, EventHandler};

const PAGE_STEP: usize = 10;

/// Run the terminal UI until the user quits.
pub async fn run(config: Config, state: Arc<AppState>, transcript: Arc<Transcript>) -> Result<()> {
    terminal::install_panic_hook();
    let mut tui = terminal::init()?;
    let mut events = EventHandler::new();

    let (link_tx, mut link_rx) = mpsc::channel::<LinkEvent>(32);
    let sender = CommandSender::new();
    let processor = EventProcessor::new(state.clone(), transcript.clone());
    let mut app = TerminalApp::new();

    loop {
        tui.draw(|f| render::draw(f, &app, &state, &transcript, &config))?;

        tokio::select! {
            Some(event) = events.next() => {
                if let AppEvent::Key(key) = event {
                    handle_key(
                        key,
                        &mut app,
                        &config,
                        &state,
                        &transcript,
                        &sender,
                        &processor,
                        &link_tx,
                    );
                }
            }
            Some(link_event) = link_rx.recv() => {
                processor.process_event(link_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Teardown closes the socket; there is no other shutdown signal.
    sender.detach().await;
    terminal::restore()?;
    info!("Terminal UI stopped");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_key(
    key: KeyEvent,
    app: &mut TerminalApp,
    config: &Config,
    state: &Arc<AppState>,
    transcript: &Arc<Transcript>,
    sender: &CommandSender,
    processor: &EventProcessor,
    link_tx: &mpsc::Sender<LinkEvent>,
) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::F(2) => connect(config, state, transcript, sender, link_tx),
        KeyCode::Enter => {
            if let Some(command) = app.take_input() {
                let processor = processor.clone();
                let sender = sender.clone();
                tokio::spawn(async move {
                    processor.send_command(&sender, &command).await;
                });
            }
        }
        KeyCode::PageUp => app.scroll_up(PAGE_STEP, transcript.len()),
        KeyCode::PageDown => app.scroll_down(PAGE_STEP),
        KeyCode::Up => app.scroll_up(1, transcript.len()),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Start a connect attempt unless one is already running.
fn connect(
    config: &Config,
    state: &Arc<AppState>,
    transcript: &Arc<Transcript>,
    sender: &CommandSender,
    link_tx: &mpsc::Sender<LinkEvent>,
) {
    match state.status() {
        LinkStatus::Connecting => {
            transcript.notice("Connection attempt already in progress");
            return;
        }
        LinkStatus::Connected => {
            transcript.notice(state.status_line());
            return;
        }
        LinkStatus::Disconnected => {}
    }

    state.set_connecting();
    transcript.notice(format!(
        "Connecting to '{}'...",
        config.bluetooth.device_name
    ));

    tokio::spawn(link::connect_and_run(
        config.bluetooth.clone(),
        sender.clone(),
        link_tx.clone(),
    ));
}
