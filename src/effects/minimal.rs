//! Plain-text presenter: coloured letter and feedback line, no animation

use super::messages;
use super::scene::{Scene, SoundCue, Style, Tone};
use super::{EffectError, EffectTicket, Presenter};
use crate::config::Timings;
use crate::session::Letter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

pub struct MinimalPresenter {
    scene: Scene,
    timings: Timings,
    sound: bool,
    rng: StdRng,
}

impl MinimalPresenter {
    pub fn new(timings: Timings, sound: bool) -> Self {
        MinimalPresenter {
            scene: Scene::new(Style::Minimal),
            timings,
            sound,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Nothing animates here
    pub fn tick(&mut self, _now: Instant) {}
}

impl Presenter for MinimalPresenter {
    fn on_letter_shown(&mut self, letter: Letter) {
        self.scene.letter = Some(letter);
        self.scene.feedback = None;
        self.scene.highlighted_key = None;
        if self.sound {
            self.scene.push_cue(SoundCue::Letter(letter));
        }
    }

    fn on_progress(&mut self, stage_number: usize, fraction: f32) {
        self.scene.stage_label = Some(messages::stage_label(stage_number));
        self.scene.progress = fraction;
    }

    fn on_correct_answer(
        &mut self,
        _letter: Letter,
        done: EffectTicket,
    ) -> Result<(), EffectError> {
        self.scene.set_feedback(messages::CORRECT, Tone::Correct);
        self.scene.highlighted_key = None;
        done.complete_after(self.timings.correct);
        Ok(())
    }

    fn on_wrong_answer(&mut self, target: Letter) {
        self.scene.set_feedback(messages::WRONG, Tone::Wrong);
        self.scene.highlighted_key = Some(target);
    }

    fn on_wrong_feedback_cleared(&mut self) {
        self.scene.clear_feedback(Tone::Wrong);
        self.scene.highlighted_key = None;
    }

    fn on_stage_celebration(&mut self, done: EffectTicket) -> Result<(), EffectError> {
        self.scene.progress = 1.0;
        self.scene
            .set_feedback(messages::motivational(&mut self.rng), Tone::Celebration);
        if self.sound {
            self.scene.push_cue(SoundCue::Celebration);
        }
        done.complete_after(self.timings.celebration);
        Ok(())
    }

    fn on_game_complete(&mut self) {
        self.scene.completed = true;
        self.scene.set_feedback(messages::GAME_COMPLETE, Tone::Complete);
    }

    fn on_session_reset(&mut self) {
        self.scene = Scene::new(Style::Minimal);
    }
}
