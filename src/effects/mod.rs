//! Presentation effects: how the game reacts on screen to state changes
//!
//! # Components
//! - `ticket.rs`: one-shot completion tickets and the wakeup channel
//! - `scene.rs`: the frame model presenters write and the display draws
//! - `rich.rs`: animated presenter (block glyphs, debris, confetti)
//! - `minimal.rs`: plain-text presenter for small or colourless terminals
//! - `messages.rs`: feedback text
//! - `glyphs.rs`: block font for the large letter

pub mod glyphs;
pub mod messages;
pub mod minimal;
pub mod rich;
pub mod scene;
pub mod ticket;

pub use minimal::MinimalPresenter;
pub use rich::RichPresenter;
pub use scene::Scene;
pub use ticket::{Delivery, EffectTicket, TicketBook, Wakeup};

use crate::config::Timings;
use crate::session::Letter;
use clap::ValueEnum;
use std::time::Instant;
use thiserror::Error;

/// Rich presentation needs at least this much room
pub const RICH_MIN_WIDTH: u16 = 60;
pub const RICH_MIN_HEIGHT: u16 = 20;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("{effect} effect needs {needed_width}x{needed_height}, terminal is {width}x{height}")]
    CanvasTooSmall {
        effect: &'static str,
        width: u16,
        height: u16,
        needed_width: u16,
        needed_height: u16,
    },
}

/// Reactions to progression events.
///
/// Methods taking an [`EffectTicket`] gate a state transition. The ticket must
/// be completed (or dropped) exactly once. An effect that cannot play should
/// still complete it after the plain delay before returning its error; a
/// dropped ticket fires at once, so the controller advances either way.
pub trait Presenter {
    fn on_letter_shown(&mut self, letter: Letter);
    fn on_progress(&mut self, stage_number: usize, fraction: f32);
    fn on_correct_answer(&mut self, letter: Letter, done: EffectTicket)
        -> Result<(), EffectError>;
    /// `target` is the letter the player should have pressed
    fn on_wrong_answer(&mut self, target: Letter);
    fn on_wrong_feedback_cleared(&mut self);
    fn on_stage_celebration(&mut self, done: EffectTicket) -> Result<(), EffectError>;
    fn on_game_complete(&mut self);
    fn on_session_reset(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PresentationMode {
    /// Pick from terminal capabilities
    #[default]
    Auto,
    Rich,
    Minimal,
}

/// What the terminal can show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub color: bool,
    pub width: u16,
    pub height: u16,
}

impl Capabilities {
    /// Probe the current terminal
    pub fn detect() -> Self {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        let color = std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true);
        Capabilities {
            color,
            width,
            height,
        }
    }

    pub fn supports_rich(&self) -> bool {
        self.color && self.width >= RICH_MIN_WIDTH && self.height >= RICH_MIN_HEIGHT
    }
}

/// Presenter chosen at startup by capability
pub enum AnyPresenter {
    Rich(RichPresenter),
    Minimal(MinimalPresenter),
}

impl AnyPresenter {
    pub fn select(
        mode: PresentationMode,
        caps: &Capabilities,
        timings: Timings,
        sound: bool,
    ) -> Self {
        let rich = match mode {
            PresentationMode::Rich => true,
            PresentationMode::Minimal => false,
            PresentationMode::Auto => caps.supports_rich(),
        };
        tracing::info!(?mode, rich, ?caps, "presentation selected");
        if rich {
            AnyPresenter::Rich(RichPresenter::new(timings, sound, caps.width, caps.height))
        } else {
            AnyPresenter::Minimal(MinimalPresenter::new(timings, sound))
        }
    }

    pub fn scene(&self) -> &Scene {
        match self {
            AnyPresenter::Rich(p) => p.scene(),
            AnyPresenter::Minimal(p) => p.scene(),
        }
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        match self {
            AnyPresenter::Rich(p) => p.scene_mut(),
            AnyPresenter::Minimal(p) => p.scene_mut(),
        }
    }

    /// Advance animations to `now`
    pub fn tick(&mut self, now: Instant) {
        match self {
            AnyPresenter::Rich(p) => p.tick(now),
            AnyPresenter::Minimal(p) => p.tick(now),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if let AnyPresenter::Rich(p) = self {
            p.resize(width, height);
        }
    }
}

impl Presenter for AnyPresenter {
    fn on_letter_shown(&mut self, letter: Letter) {
        match self {
            AnyPresenter::Rich(p) => p.on_letter_shown(letter),
            AnyPresenter::Minimal(p) => p.on_letter_shown(letter),
        }
    }

    fn on_progress(&mut self, stage_number: usize, fraction: f32) {
        match self {
            AnyPresenter::Rich(p) => p.on_progress(stage_number, fraction),
            AnyPresenter::Minimal(p) => p.on_progress(stage_number, fraction),
        }
    }

    fn on_correct_answer(
        &mut self,
        letter: Letter,
        done: EffectTicket,
    ) -> Result<(), EffectError> {
        match self {
            AnyPresenter::Rich(p) => p.on_correct_answer(letter, done),
            AnyPresenter::Minimal(p) => p.on_correct_answer(letter, done),
        }
    }

    fn on_wrong_answer(&mut self, target: Letter) {
        match self {
            AnyPresenter::Rich(p) => p.on_wrong_answer(target),
            AnyPresenter::Minimal(p) => p.on_wrong_answer(target),
        }
    }

    fn on_wrong_feedback_cleared(&mut self) {
        match self {
            AnyPresenter::Rich(p) => p.on_wrong_feedback_cleared(),
            AnyPresenter::Minimal(p) => p.on_wrong_feedback_cleared(),
        }
    }

    fn on_stage_celebration(&mut self, done: EffectTicket) -> Result<(), EffectError> {
        match self {
            AnyPresenter::Rich(p) => p.on_stage_celebration(done),
            AnyPresenter::Minimal(p) => p.on_stage_celebration(done),
        }
    }

    fn on_game_complete(&mut self) {
        match self {
            AnyPresenter::Rich(p) => p.on_game_complete(),
            AnyPresenter::Minimal(p) => p.on_game_complete(),
        }
    }

    fn on_session_reset(&mut self) {
        match self {
            AnyPresenter::Rich(p) => p.on_session_reset(),
            AnyPresenter::Minimal(p) => p.on_session_reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::scene::Style;

    fn caps(color: bool, width: u16, height: u16) -> Capabilities {
        Capabilities {
            color,
            width,
            height,
        }
    }

    #[test]
    fn test_supports_rich_needs_color_and_room() {
        assert!(caps(true, 80, 24).supports_rich());
        assert!(!caps(false, 80, 24).supports_rich());
        assert!(!caps(true, 40, 24).supports_rich());
        assert!(!caps(true, 80, 10).supports_rich());
    }

    #[test]
    fn test_select_follows_mode_and_capabilities() {
        let timings = Timings::default();
        let small = caps(true, 40, 12);
        let roomy = caps(true, 100, 30);

        let auto_small = AnyPresenter::select(PresentationMode::Auto, &small, timings, false);
        assert_eq!(auto_small.scene().style, Style::Minimal);

        let auto_roomy = AnyPresenter::select(PresentationMode::Auto, &roomy, timings, false);
        assert_eq!(auto_roomy.scene().style, Style::Rich);

        let forced = AnyPresenter::select(PresentationMode::Rich, &small, timings, false);
        assert_eq!(forced.scene().style, Style::Rich);

        let plain = AnyPresenter::select(PresentationMode::Minimal, &roomy, timings, false);
        assert_eq!(plain.scene().style, Style::Minimal);
    }
}
