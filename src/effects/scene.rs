//! Presentation model written by presenters and drawn by the terminal display

use crate::session::Letter;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Rich,
    Minimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// Letter drops in and bounces
    Bounce,
    /// Letter breaks apart after a correct answer
    Disintegrate,
    /// Confetti burst at the end of a stage
    Celebrate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub started: Instant,
    pub duration: Duration,
}

impl Animation {
    pub fn new(kind: AnimationKind, duration: Duration) -> Self {
        Animation {
            kind,
            started: Instant::now(),
            duration,
        }
    }

    /// Fraction of the animation played at `now` (0.0-1.0)
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A single confetti or debris cell, in screen coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub glyph: char,
    /// ANSI 256-colour index
    pub color: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Letter(Letter),
    Celebration,
}

impl SoundCue {
    pub fn asset_path(&self) -> String {
        match self {
            SoundCue::Letter(letter) => letter.sound_asset(),
            SoundCue::Celebration => "sounds/celebration.mp3".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Correct,
    Wrong,
    Celebration,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
}

/// Everything the display needs to draw one frame
#[derive(Clone, Debug)]
pub struct Scene {
    pub style: Style,
    pub letter: Option<Letter>,
    pub stage_label: Option<String>,
    pub progress: f32,
    pub feedback: Option<Feedback>,
    /// Key hinted on the on-screen keyboard after a wrong guess
    pub highlighted_key: Option<Letter>,
    pub animation: Option<Animation>,
    pub particles: Vec<Particle>,
    pub completed: bool,
    cues: Vec<SoundCue>,
}

impl Scene {
    pub fn new(style: Style) -> Self {
        Scene {
            style,
            letter: None,
            stage_label: None,
            progress: 0.0,
            feedback: None,
            highlighted_key: None,
            animation: None,
            particles: Vec::new(),
            completed: false,
            cues: Vec::new(),
        }
    }

    pub fn set_feedback(&mut self, text: impl Into<String>, tone: Tone) {
        self.feedback = Some(Feedback {
            text: text.into(),
            tone,
        });
    }

    /// Clear the feedback line only if it currently shows `tone`
    pub fn clear_feedback(&mut self, tone: Tone) {
        if self.feedback.as_ref().is_some_and(|f| f.tone == tone) {
            self.feedback = None;
        }
    }

    pub fn push_cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Drain queued sound cues for playback
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_progress_clamps() {
        let anim = Animation::new(AnimationKind::Bounce, Duration::from_millis(500));
        let later = anim.started + Duration::from_millis(250);
        assert!((anim.progress(later) - 0.5).abs() < 1e-3);
        assert_eq!(anim.progress(anim.started + Duration::from_secs(5)), 1.0);
        assert!(anim.is_finished(anim.started + Duration::from_millis(500)));

        let instant = Animation::new(AnimationKind::Celebrate, Duration::ZERO);
        assert_eq!(instant.progress(instant.started), 1.0);
    }

    #[test]
    fn test_clear_feedback_respects_tone() {
        let mut scene = Scene::new(Style::Minimal);
        scene.set_feedback("nice", Tone::Correct);
        scene.clear_feedback(Tone::Wrong);
        assert!(scene.feedback.is_some());
        scene.clear_feedback(Tone::Correct);
        assert!(scene.feedback.is_none());
    }

    #[test]
    fn test_cues_drain_once() {
        let mut scene = Scene::new(Style::Rich);
        scene.push_cue(SoundCue::Celebration);
        assert_eq!(scene.take_cues(), vec![SoundCue::Celebration]);
        assert!(scene.take_cues().is_empty());
        assert_eq!(SoundCue::Celebration.asset_path(), "sounds/celebration.mp3");
    }
}
