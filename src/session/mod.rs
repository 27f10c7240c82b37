//! Session Management: stage table, session state and the progression controller
//!
//! # Components
//! - `stages.rs`: Letter, Stage and StageTable (built-in or loaded from JSON)
//! - `state.rs`: SessionState flags and the derived Phase
//! - `controller.rs`: ProgressionController state machine and input gate

pub mod controller;
pub mod stages;
pub mod state;

pub use controller::ProgressionController;
pub use stages::{Letter, StageTable};
pub use state::{Phase, SessionState};
