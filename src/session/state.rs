//! Session state tracking
//!
//! Maintains:
//! - Stage and letter position
//! - Target letter for the input gate
//! - Lock, busy, active and completed flags
//! - Wrong-feedback visibility and per-session counters

use super::stages::Letter;
use std::time::Instant;

/// Where the progression state machine currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Before the first stage starts
    Idle,
    /// Waiting for the player to press `stage_index, letter_index`
    StageActive {
        stage_index: usize,
        letter_index: usize,
    },
    /// Correct-answer effect in flight
    LetterTransition,
    /// Stage celebration in flight; the next stage has not started
    StageTransition,
    /// Last letter of the last stage answered
    Completed,
}

/// Transition currently holding `input_locked`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Letter,
    Stage,
}

/// Complete session state
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Current stage; equals the stage count once the game is complete
    pub stage_index: usize,
    /// Next letter to answer within the stage
    pub letter_index: usize,
    /// Letter the input gate compares against
    pub current_letter: Option<Letter>,
    /// Set while a correct-answer effect or a celebration is in flight
    pub input_locked: bool,
    pub active: bool,
    pub completed: bool,
    /// Set while the letter entrance animation plays
    pub busy: bool,
    pub transition: Option<Transition>,
    /// Ticket sequence of the wrong-answer message on screen, if any
    pub wrong_feedback: Option<u64>,
    pub letters_answered: u32,
    pub wrong_guesses: u32,
    pub start_time: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The input gate: `active && !input_locked && !busy`
    pub fn accepts_input(&self) -> bool {
        self.active && !self.input_locked && !self.busy
    }

    pub fn phase(&self) -> Phase {
        if self.completed {
            return Phase::Completed;
        }
        if !self.active {
            return Phase::Idle;
        }
        match self.transition {
            Some(Transition::Letter) => Phase::LetterTransition,
            Some(Transition::Stage) => Phase::StageTransition,
            None => Phase::StageActive {
                stage_index: self.stage_index,
                letter_index: self.letter_index,
            },
        }
    }

    /// Get session duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}
