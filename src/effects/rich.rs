//! Animated presenter
//!
//! Features:
//! - Block-glyph letter with a bounce on entrance
//! - Letter breaks into debris on a correct answer
//! - Confetti burst on stage completion
//! - Terminal bell sound cues

use super::glyphs::{self, CELL_WIDTH};
use super::messages;
use super::scene::{Animation, AnimationKind, Particle, Scene, SoundCue, Style, Tone};
use super::{EffectError, EffectTicket, Presenter, RICH_MIN_HEIGHT, RICH_MIN_WIDTH};
use crate::config::Timings;
use crate::session::Letter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use std::time::Instant;

/// Cells per second squared
const GRAVITY: f32 = 18.0;
const CONFETTI_COUNT: usize = 100;
/// Cone of the confetti burst, in degrees either side of straight up
const CONFETTI_SPREAD: f32 = 35.0;
const CONFETTI_GLYPHS: [char; 5] = ['*', '•', '+', '✦', '○'];
const CONFETTI_COLORS: [u8; 6] = [196, 208, 226, 46, 51, 201];
const DEBRIS_GLYPHS: [char; 3] = ['▓', '▒', '░'];

pub struct RichPresenter {
    scene: Scene,
    timings: Timings,
    sound: bool,
    rng: StdRng,
    width: u16,
    height: u16,
    last_tick: Option<Instant>,
}

impl RichPresenter {
    pub fn new(timings: Timings, sound: bool, width: u16, height: u16) -> Self {
        Self::with_rng(timings, sound, width, height, StdRng::from_entropy())
    }

    pub fn with_rng(timings: Timings, sound: bool, width: u16, height: u16, rng: StdRng) -> Self {
        RichPresenter {
            scene: Scene::new(Style::Rich),
            timings,
            sound,
            rng,
            width,
            height,
            last_tick: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn check_canvas(&self, effect: &'static str) -> Result<(), EffectError> {
        if self.width < RICH_MIN_WIDTH || self.height < RICH_MIN_HEIGHT {
            return Err(EffectError::CanvasTooSmall {
                effect,
                width: self.width,
                height: self.height,
                needed_width: RICH_MIN_WIDTH,
                needed_height: RICH_MIN_HEIGHT,
            });
        }
        Ok(())
    }

    /// Move particles and retire finished animations
    pub fn tick(&mut self, now: Instant) {
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        let (width, height) = (f32::from(self.width), f32::from(self.height));
        for particle in &mut self.scene.particles {
            particle.x += particle.vx * dt;
            particle.y += particle.vy * dt;
            particle.vy += GRAVITY * dt;
        }
        self.scene
            .particles
            .retain(|p| p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y < height);

        if self.scene.animation.is_some_and(|a| a.is_finished(now)) {
            self.scene.animation = None;
        }
    }

    fn shatter(&mut self, letter: Letter) {
        let (ox, oy) = glyphs::origin(self.width);
        let cells: Vec<(usize, usize)> = glyphs::filled_cells(letter).collect();
        for (x, y) in cells {
            for half in 0..CELL_WIDTH {
                let angle = self.rng.gen_range(0.0..2.0 * PI);
                let speed = self.rng.gen_range(4.0..14.0);
                self.scene.particles.push(Particle {
                    x: f32::from(ox) + (x as u16 * CELL_WIDTH + half) as f32,
                    y: f32::from(oy) + y as f32,
                    vx: angle.cos() * speed * 2.0,
                    vy: angle.sin() * speed - 4.0,
                    glyph: DEBRIS_GLYPHS[self.rng.gen_range(0..DEBRIS_GLYPHS.len())],
                    color: 46,
                });
            }
        }
    }

    fn confetti(&mut self) {
        let origin_x = f32::from(self.width) / 2.0;
        let origin_y = f32::from(self.height) * 0.6;
        for _ in 0..CONFETTI_COUNT {
            let spread = self.rng.gen_range(-CONFETTI_SPREAD..CONFETTI_SPREAD);
            let angle = (-90.0 + spread) * PI / 180.0;
            let speed = self.rng.gen_range(10.0..26.0);
            self.scene.particles.push(Particle {
                x: origin_x,
                y: origin_y,
                vx: angle.cos() * speed * 2.0,
                vy: angle.sin() * speed,
                glyph: CONFETTI_GLYPHS[self.rng.gen_range(0..CONFETTI_GLYPHS.len())],
                color: CONFETTI_COLORS[self.rng.gen_range(0..CONFETTI_COLORS.len())],
            });
        }
    }
}

impl Presenter for RichPresenter {
    fn on_letter_shown(&mut self, letter: Letter) {
        self.scene.letter = Some(letter);
        self.scene.feedback = None;
        self.scene.highlighted_key = None;
        self.scene.animation = Some(Animation::new(
            AnimationKind::Bounce,
            self.timings.letter_settle,
        ));
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
        letter: Letter,
        done: EffectTicket,
    ) -> Result<(), EffectError> {
        self.scene.set_feedback(messages::CORRECT, Tone::Correct);
        self.scene.highlighted_key = None;
        if let Err(err) = self.check_canvas("disintegrate") {
            done.complete_after(self.timings.correct);
            return Err(err);
        }

        self.shatter(letter);
        self.scene.animation = Some(Animation::new(
            AnimationKind::Disintegrate,
            self.timings.correct,
        ));
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
        if let Err(err) = self.check_canvas("celebration") {
            done.complete_after(self.timings.celebration);
            return Err(err);
        }

        self.confetti();
        self.scene.animation = Some(Animation::new(
            AnimationKind::Celebrate,
            self.timings.celebration,
        ));
        done.complete_after(self.timings.celebration);
        Ok(())
    }

    fn on_game_complete(&mut self) {
        self.scene.completed = true;
        self.scene.set_feedback(messages::GAME_COMPLETE, Tone::Complete);
    }

    fn on_session_reset(&mut self) {
        self.scene = Scene::new(Style::Rich);
        self.last_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{TicketBook, Wakeup};
    use std::time::Duration;

    fn presenter(width: u16, height: u16) -> RichPresenter {
        RichPresenter::with_rng(
            Timings::default(),
            false,
            width,
            height,
            StdRng::seed_from_u64(42),
        )
    }

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_celebration_bursts_confetti() {
        let (mut book, mut rx) = TicketBook::channel();
        let mut rich = presenter(80, 24);

        rich.on_stage_celebration(book.issue(Wakeup::CelebrationDone))
            .unwrap();

        assert_eq!(rich.scene().particles.len(), CONFETTI_COUNT);
        assert_eq!(
            rich.scene().animation.map(|a| a.kind),
            Some(AnimationKind::Celebrate)
        );
        assert_eq!(rx.recv().await.unwrap().wakeup, Wakeup::CelebrationDone);
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_shatters_letter() {
        let (mut book, _rx) = TicketBook::channel();
        let mut rich = presenter(80, 24);
        rich.on_letter_shown(letter('i'));

        rich.on_correct_answer(letter('i'), book.issue(Wakeup::CorrectAnswerDone))
            .unwrap();

        let debris = glyphs::filled_cells(letter('i')).count() * CELL_WIDTH as usize;
        assert_eq!(rich.scene().particles.len(), debris);
        assert_eq!(
            rich.scene().animation.map(|a| a.kind),
            Some(AnimationKind::Disintegrate)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_small_canvas_fails_with_plain_timing() {
        let (mut book, mut rx) = TicketBook::channel();
        let mut rich = presenter(30, 10);
        let started = tokio::time::Instant::now();

        let err = rich
            .on_correct_answer(letter('a'), book.issue(Wakeup::CorrectAnswerDone))
            .unwrap_err();
        assert!(matches!(err, EffectError::CanvasTooSmall { width: 30, .. }));
        assert!(rich.scene().particles.is_empty());
        assert_eq!(rich.scene().feedback.as_ref().unwrap().tone, Tone::Correct);

        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await.unwrap().wakeup, Wakeup::CorrectAnswerDone);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_small_canvas_celebration_keeps_message_up() {
        let (mut book, mut rx) = TicketBook::channel();
        let mut rich = presenter(30, 10);
        let started = tokio::time::Instant::now();

        assert!(rich
            .on_stage_celebration(book.issue(Wakeup::CelebrationDone))
            .is_err());
        assert!(rich.scene().particles.is_empty());
        assert_eq!(
            rich.scene().feedback.as_ref().unwrap().tone,
            Tone::Celebration
        );

        assert_eq!(rx.recv().await.unwrap().wakeup, Wakeup::CelebrationDone);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }

    #[test]
    fn test_tick_moves_and_culls_particles() {
        let mut rich = presenter(80, 24);
        rich.scene.particles = vec![
            Particle {
                x: 10.0,
                y: 10.0,
                vx: 2.0,
                vy: 0.0,
                glyph: '*',
                color: 1,
            },
            Particle {
                x: 79.5,
                y: 5.0,
                vx: 10.0,
                vy: 0.0,
                glyph: '*',
                color: 1,
            },
        ];

        let start = Instant::now();
        rich.tick(start);
        rich.tick(start + Duration::from_millis(500));

        assert_eq!(rich.scene().particles.len(), 1);
        let p = rich.scene().particles[0];
        assert!((p.x - 11.0).abs() < 1e-3);
        assert!(p.vy > 0.0);
    }

    #[test]
    fn test_tick_retires_finished_animation() {
        let mut rich = presenter(80, 24);
        rich.on_letter_shown(letter('b'));
        let started = rich.scene().animation.unwrap().started;

        rich.tick(started + Duration::from_millis(100));
        assert!(rich.scene().animation.is_some());
        rich.tick(started + Timings::default().letter_settle);
        assert!(rich.scene().animation.is_none());
    }
}
