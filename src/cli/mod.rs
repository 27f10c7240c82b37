//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke and click capture using crossterm
//! - `keyboard.rs`: On-screen QWERTY layout and hit-testing
//! - `display.rs`: Terminal rendering and UI

pub mod display;
pub mod input;
pub mod keyboard;

pub use display::{Display, Frame};
pub use input::{Command, InputHandler, InputMsg, InputPump};
