//! Progression controller: the stage/letter state machine and its input gate
//!
//! Input events and effect completions are the only things that move the
//! session forward. A correct answer locks input and hands a ticket to the
//! presenter; the state advances only when that ticket comes back as a
//! wakeup, so a second keypress can never advance twice.

use super::stages::{Letter, StageTable};
use super::state::{Phase, SessionState, Transition};
use crate::config::Timings;
use crate::effects::{Delivery, Presenter, TicketBook, Wakeup};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Why a keypress was not evaluated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotALetter,
    Inactive,
    Locked,
    Busy,
}

/// Result of feeding one keypress to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored(Rejection),
    Correct,
    Wrong,
    /// Wrong, but a wrong-answer message is already on screen
    WrongSuppressed,
}

pub struct ProgressionController<P> {
    stages: StageTable,
    timings: Timings,
    presenter: P,
    tickets: TicketBook,
    state: SessionState,
}

impl<P: Presenter> ProgressionController<P> {
    pub fn new(stages: StageTable, timings: Timings, presenter: P, tickets: TicketBook) -> Self {
        ProgressionController {
            stages,
            timings,
            presenter,
            tickets,
            state: SessionState::new(),
        }
    }

    /// Begin the first stage. Only valid from `Idle`; returns false otherwise.
    pub fn start_game(&mut self) -> bool {
        let phase = self.state.phase();
        if phase != Phase::Idle {
            debug!(?phase, "start ignored: session not idle");
            return false;
        }

        self.state = SessionState {
            active: true,
            start_time: Some(Instant::now()),
            ..SessionState::default()
        };
        info!(
            stages = self.stages.len(),
            letters = self.stages.total_letters(),
            "game started"
        );
        self.advance();
        true
    }

    /// Drop the current session and return to `Idle`. Effects still in
    /// flight deliver into the old session and are discarded.
    pub fn reset(&mut self) {
        self.tickets.next_epoch();
        self.state = SessionState::new();
        self.presenter.on_session_reset();
        info!(epoch = self.tickets.epoch(), "session reset");
    }

    /// Evaluate one keypress through the input gate
    pub fn submit_input(&mut self, key: char) -> InputOutcome {
        if let Some(rejection) = self.gate() {
            trace!(?key, ?rejection, "input ignored");
            return InputOutcome::Ignored(rejection);
        }
        let Some(pressed) = Letter::from_char(key) else {
            trace!(?key, "non-letter input ignored");
            return InputOutcome::Ignored(Rejection::NotALetter);
        };
        let Some(target) = self.state.current_letter else {
            warn!("input gate open without a target letter");
            return InputOutcome::Ignored(Rejection::Inactive);
        };

        if pressed == target {
            self.state.input_locked = true;
            self.state.transition = Some(Transition::Letter);
            self.state.wrong_feedback = None;
            self.state.letters_answered += 1;
            debug!(
                letter = %target,
                stage = self.state.stage_index + 1,
                index = self.state.letter_index,
                "correct answer"
            );

            let ticket = self.tickets.issue(Wakeup::CorrectAnswerDone);
            if let Err(err) = self.presenter.on_correct_answer(target, ticket) {
                warn!(error = %err, letter = %target, "correct-answer effect failed; advancing without it");
            }
            return InputOutcome::Correct;
        }

        self.state.wrong_guesses += 1;
        if self.state.wrong_feedback.is_some() {
            trace!(pressed = %pressed, target = %target, "wrong answer while feedback visible");
            return InputOutcome::WrongSuppressed;
        }

        debug!(pressed = %pressed, target = %target, "wrong answer");
        let ticket = self.tickets.issue(Wakeup::WrongFeedbackExpired);
        self.state.wrong_feedback = ticket.seq();
        self.presenter.on_wrong_answer(target);
        ticket.complete_after(self.timings.wrong_feedback);
        InputOutcome::Wrong
    }

    /// Apply a fired effect ticket
    pub fn handle(&mut self, delivery: Delivery) {
        if !self.tickets.settle(&delivery) {
            debug!(?delivery, "stale wakeup ignored");
            return;
        }

        match delivery.wakeup {
            Wakeup::CorrectAnswerDone => self.finish_letter(),
            Wakeup::LetterSettled => {
                self.state.busy = false;
                trace!(letter = ?self.state.current_letter, "letter settled");
            }
            Wakeup::WrongFeedbackExpired => {
                if self.state.wrong_feedback == Some(delivery.seq) {
                    self.state.wrong_feedback = None;
                    self.presenter.on_wrong_feedback_cleared();
                }
            }
            Wakeup::CelebrationDone => self.finish_stage(),
        }
    }

    fn gate(&self) -> Option<Rejection> {
        if !self.state.active {
            Some(Rejection::Inactive)
        } else if self.state.input_locked {
            Some(Rejection::Locked)
        } else if self.state.busy {
            Some(Rejection::Busy)
        } else {
            None
        }
    }

    fn finish_letter(&mut self) {
        if self.state.transition != Some(Transition::Letter) {
            warn!(phase = ?self.state.phase(), "correct-answer completion outside a letter transition");
            return;
        }
        self.state.letter_index += 1;
        self.state.input_locked = false;
        self.state.transition = None;
        self.advance();
    }

    fn finish_stage(&mut self) {
        if self.state.transition != Some(Transition::Stage) {
            warn!(phase = ?self.state.phase(), "celebration completion outside a stage transition");
            return;
        }
        self.state.transition = None;
        self.state.input_locked = false;
        if self.state.completed {
            debug!("final celebration finished");
            return;
        }

        self.state.letter_index = 0;
        info!(stage = self.state.stage_index + 1, "stage started");
        self.advance();
    }

    /// Show the next letter of the stage, or close the stage out
    fn advance(&mut self) {
        let stage_index = self.state.stage_index;
        let Some(stage) = self.stages.get(stage_index) else {
            warn!(stage_index, "advance past the last stage");
            return;
        };

        if let Some(letter) = stage.get(self.state.letter_index) {
            self.state.current_letter = Some(letter);
            self.state.busy = true;
            let (stage_number, fraction) = (self.stage_number(), self.progress_fraction());
            self.presenter.on_letter_shown(letter);
            self.presenter.on_progress(stage_number, fraction);
            debug!(%letter, stage = stage_number, index = self.state.letter_index, "letter shown");

            self.tickets
                .issue(Wakeup::LetterSettled)
                .complete_after(self.timings.letter_settle);
            return;
        }

        let is_final = self.stages.is_final(stage_index);
        info!(stage = stage_index + 1, is_final, "stage cleared");
        if is_final {
            self.state.completed = true;
        }
        self.state.input_locked = true;
        self.state.transition = Some(Transition::Stage);
        self.state.stage_index += 1;
        self.state.wrong_feedback = None;

        let ticket = self.tickets.issue(Wakeup::CelebrationDone);
        if let Err(err) = self.presenter.on_stage_celebration(ticket) {
            warn!(error = %err, "celebration effect failed; continuing without it");
        }

        if is_final {
            self.state.active = false;
            info!(
                answered = self.state.letters_answered,
                wrong = self.state.wrong_guesses,
                secs = self.state.duration_secs(),
                "game complete"
            );
            self.presenter.on_game_complete();
        }
    }

    /// Progress within the current stage (0.0-1.0)
    pub fn progress_fraction(&self) -> f32 {
        match self.state.phase() {
            Phase::Idle => 0.0,
            Phase::StageTransition | Phase::Completed => 1.0,
            Phase::StageActive { .. } | Phase::LetterTransition => self
                .stages
                .get(self.state.stage_index)
                .map(|stage| self.state.letter_index as f32 / stage.len() as f32)
                .unwrap_or(0.0),
        }
    }

    /// 1-based stage number, held at the last stage once the game is complete
    pub fn stage_number(&self) -> usize {
        let last = self.stages.len().saturating_sub(1);
        self.state.stage_index.min(last) + 1
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn accepts_input(&self) -> bool {
        self.state.accepts_input()
    }

    pub fn stages(&self) -> &StageTable {
        &self.stages
    }

    /// Effect tickets issued but not yet handled
    pub fn pending_effects(&self) -> usize {
        self.tickets.outstanding()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
