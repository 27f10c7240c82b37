//! Keystroke and mouse input using crossterm
//!
//! Features:
//! - Input thread feeding a tokio channel
//! - Key and click classification into game commands
//! - Ctrl+C / Escape graceful exit

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// Poll interval on the input thread (50ms keeps shutdown responsive)
const POLL_TIMEOUT: Duration = Duration::from_millis(50);
const CHANNEL_CAPACITY: usize = 64;

/// What a terminal event means to the game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Typed character, not yet validated as a letter
    Key(char),
    /// Left click at a screen cell
    Click { column: u16, row: u16 },
    /// Enter: start, or play again after completion
    Start,
    Quit,
    Resize { width: u16, height: u16 },
}

/// Message from the input thread
#[derive(Debug)]
pub enum InputMsg {
    Event(Event),
    Error(String),
}

/// Classifies raw terminal events
pub struct InputHandler;

impl InputHandler {
    /// Map a terminal event to a command; presses only, releases are dropped
    pub fn classify(event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::classify_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(Command::Click {
                    column: mouse.column,
                    row: mouse.row,
                }),
                _ => None,
            },
            Event::Resize(width, height) => Some(Command::Resize {
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }

    fn classify_key(key: &KeyEvent) -> Option<Command> {
        if Self::is_exit(key) {
            return Some(Command::Quit);
        }
        if matches!(key.code, KeyCode::Enter) {
            return Some(Command::Start);
        }
        Self::key_to_char(key).map(Command::Key)
    }

    /// Check if key event is an exit signal (Ctrl+C or Escape)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Esc => true,
            _ => false,
        }
    }

    /// Plain character input, without Ctrl or Alt
    pub fn key_to_char(key: &KeyEvent) -> Option<char> {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

/// Reads terminal events on a dedicated thread
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let join = std::thread::spawn(move || input_loop(thread_stop, tx));
        InputPump {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn recv(&mut self) -> Option<InputMsg> {
        self.rx.recv().await
    }

    pub fn shutdown(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::warn!("input thread panicked");
            }
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Do not join here; the thread exits on its next poll
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}
